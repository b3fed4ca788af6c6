// Unit tests for usermgmt-portal
// These tests work with the public API without modifying the main codebase

#[cfg(test)]
mod model_tests {
    use usermgmt_portal::model::{Choice, Department, ImageFile, Status, UserRecord, UserRole};

    #[test]
    fn test_user_record_from_server_json() {
        let raw = r#"[{"_id":"a1","username":"mkay","firstName":"Mary","lastName":"Kay",
            "department":"Electronics","userRole":"Teaching Staff","status":"Active",
            "dob":"1988-02-29","createdAt":"2023-11-30T23:59:59Z","__v":0}]"#;
        let users: Vec<UserRecord> = serde_json::from_str(raw).unwrap();
        assert_eq!(users.len(), 1);
        let u = &users[0];
        assert_eq!(u.id, "a1");
        assert_eq!(u.full_name(), "Mary Kay");
        assert_eq!(u.department, Department::Electronics);
        assert_eq!(u.user_role, UserRole::TeachingStaff);
        assert_eq!(u.created_date(), "2023-11-30");
    }

    #[test]
    fn test_choice_strings_match_wire_values() {
        assert_eq!(Department::ComputerScience.to_string(), "Computer Science");
        assert_eq!(UserRole::NonTeachingStaff.to_string(), "Non-Teaching Staff");
        assert_eq!(
            serde_json::to_string(&UserRole::TeachingStaff).unwrap(),
            "\"Teaching Staff\""
        );
        assert_eq!(Department::options().len(), 4);
        assert_eq!(Status::options(), &[Status::Active, Status::Inactive]);
    }

    #[test]
    fn test_filter_cycle_passes_through_all() {
        let mut seen = Vec::new();
        let mut cur: Option<UserRole> = None;
        for _ in 0..5 {
            cur = UserRole::cycle_optional(cur);
            seen.push(cur);
        }
        assert_eq!(seen[3], Some(UserRole::NonTeachingStaff));
        assert_eq!(seen[4], None);
    }

    #[test]
    fn test_image_without_extension_is_rejected() {
        let p = std::env::temp_dir().join(format!("portal_noext_{}", std::process::id()));
        std::fs::write(&p, b"xx").unwrap();
        let res = ImageFile::load(&p);
        std::fs::remove_file(&p).ok();
        assert!(res.is_err());
    }
}

#[cfg(test)]
mod validation_tests {
    use usermgmt_portal::form::{CreateForm, LoginForm, RegisterForm, UserDraft};
    use usermgmt_portal::validate::{
        self, AuthField, CreateField, NAME_CHARS, PASSWORD_LENGTH, PASSWORD_MISMATCH, REQUIRED,
    };

    #[test]
    fn test_email_shapes() {
        assert!(validate::is_valid_email("a.b+c@example.co"));
        assert!(validate::is_valid_email("USER@HOST.ORG"));
        assert!(!validate::is_valid_email("plainaddress"));
        assert!(!validate::is_valid_email("a@b"));
        assert!(!validate::is_valid_email("a b@c.com"));
    }

    #[test]
    fn test_create_rules_per_field() {
        let mut form = CreateForm::default();
        form.set_text(CreateField::FirstName, "Ann3");
        assert_eq!(form.errors.get(CreateField::FirstName), Some(NAME_CHARS));
        form.set_text(CreateField::FirstName, "Ann Marie");
        assert_eq!(form.errors.get(CreateField::FirstName), None);

        form.set_text(CreateField::Password, "short");
        assert_eq!(form.errors.get(CreateField::Password), Some(PASSWORD_LENGTH));
        form.set_text(CreateField::Password, "long enough");
        form.set_text(CreateField::ConfirmPassword, "long enougH");
        assert_eq!(
            form.errors.get(CreateField::ConfirmPassword),
            Some(PASSWORD_MISMATCH)
        );
        // other fields untouched until edited
        assert_eq!(form.errors.get(CreateField::Dob), None);
    }

    #[test]
    fn test_full_validation_flags_every_empty_field() {
        let errors = validate::validate_all(validate::CREATE_RULES, &UserDraft::default());
        for field in CreateField::INPUTS {
            assert_eq!(errors.get(field), Some(REQUIRED), "{field:?}");
        }
    }

    #[test]
    fn test_login_and_register_rules() {
        let mut login = LoginForm::default();
        login.set_text(AuthField::Email, "bad");
        assert_eq!(
            login.errors.get(AuthField::Email),
            Some(validate::INVALID_EMAIL)
        );
        login.set_text(AuthField::Password, "x");
        assert_eq!(login.errors.get(AuthField::Password), None);

        let mut reg = RegisterForm::default();
        reg.set_text(AuthField::Password, "1234567");
        assert_eq!(
            reg.errors.get(AuthField::Password),
            Some(validate::REGISTER_PASSWORD_LENGTH)
        );
        reg.set_text(AuthField::Password, "12345678");
        reg.set_text(AuthField::ConfirmPassword, "12345678");
        assert_eq!(reg.errors.get(AuthField::Password), None);
        assert_eq!(reg.errors.get(AuthField::ConfirmPassword), None);
    }
}

#[cfg(test)]
mod search_tests {
    use usermgmt_portal::model::{Department, Status, UserRecord, UserRole};
    use usermgmt_portal::search::{Counts, FilterCriteria, Pager, apply, page};

    fn create_test_user(id: usize, name: &str, d: Department, s: Status) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            username: name.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            department: d,
            user_role: UserRole::Student,
            status: s,
            dob: String::new(),
            created_at: None,
            profile_image: None,
        }
    }

    fn sample() -> Vec<UserRecord> {
        vec![
            create_test_user(1, "Zed", Department::Commerce, Status::Active),
            create_test_user(2, "amy", Department::Mathematics, Status::Inactive),
            create_test_user(3, "zoe_admin", Department::Commerce, Status::Inactive),
            create_test_user(4, "bob", Department::Electronics, Status::Active),
        ]
    }

    #[test]
    fn test_empty_criteria_keeps_everything() {
        let all = sample();
        assert_eq!(apply(&all, &FilterCriteria::default()), all);
    }

    #[test]
    fn test_search_case_insensitive_substring() {
        let c = FilterCriteria {
            search_term: "Z".into(),
            ..Default::default()
        };
        let names: Vec<_> = apply(&sample(), &c).into_iter().map(|u| u.username).collect();
        assert_eq!(names, ["Zed", "zoe_admin"]);
    }

    #[test]
    fn test_filters_combine_and_keep_order() {
        let c = FilterCriteria {
            department: Some(Department::Commerce),
            status: Some(Status::Inactive),
            ..Default::default()
        };
        let out = apply(&sample(), &c);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "3");
        assert!(out.iter().all(|u| c.matches(u)));
    }

    #[test]
    fn test_counts_over_list() {
        let c = Counts::of(&sample());
        assert_eq!((c.total, c.active, c.inactive), (4, 2, 2));
        assert_eq!(Counts::of(&[]), Counts::default());
    }

    #[test]
    fn test_page_slices_are_bounded() {
        let v: Vec<u32> = (0..23).collect();
        assert_eq!(page(&v, 0, 10).len(), 10);
        assert_eq!(page(&v, 2, 10), &[20, 21, 22]);
        assert!(page(&v, 3, 10).is_empty());
        assert!(page(&v, usize::MAX, 10).is_empty());
    }

    #[test]
    fn test_pager_guards_and_labels() {
        let mut p = Pager::default();
        assert!(!p.can_go_back());
        assert!(p.can_go_forward(11));
        assert!(!p.can_go_forward(10));
        p.last(23);
        assert_eq!(p.index, 2);
        assert_eq!(p.range_label(23), "Showing 21 to 23 of 23 entries");
        p.next(23);
        assert_eq!(p.index, 2);
        assert_eq!(p.page_count(0), 1);
        assert_eq!(Pager::default().range_label(0), "Showing 0 to 0 of 0 entries");
    }

    #[test]
    fn test_search_performance_large_dataset() {
        let many: Vec<_> = (0..5000)
            .map(|i| create_test_user(i, &format!("user{i}"), Department::Commerce, Status::Active))
            .collect();
        let c = FilterCriteria {
            search_term: "user49".into(),
            ..Default::default()
        };
        let out = apply(&many, &c);
        // user49, user490..user499, user4900..user4999
        assert_eq!(out.len(), 1 + 10 + 100);
    }
}

#[cfg(test)]
mod error_handling_tests {
    use usermgmt_portal::ApiError;

    #[test]
    fn test_user_message_prefers_server_text() {
        let e = ApiError::Status {
            status: 409,
            message: Some("Username taken".into()),
        };
        assert_eq!(e.user_message("fallback"), "Username taken");
        assert_eq!(e.reason(), "Username taken");
        assert!(e.to_string().contains("409"));
    }

    #[test]
    fn test_fallbacks_without_server_text() {
        let e = ApiError::Status {
            status: 502,
            message: None,
        };
        assert_eq!(e.user_message("Registration failed"), "Registration failed");
        assert_eq!(e.reason(), "HTTP 502");

        let blank = ApiError::Status {
            status: 400,
            message: Some("  ".into()),
        };
        assert_eq!(blank.user_message("fallback"), "fallback");
        assert_eq!(ApiError::Decode("eof".into()).status(), None);
    }
}

#[cfg(test)]
mod config_tests {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use usermgmt_portal::app::{ConfigDir, Keymap, PortalConfig, Theme};
    use usermgmt_portal::session::{Session, SessionStore};

    fn scratch_dir(tag: &str) -> PathBuf {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "portal_unit_{tag}_{}_{nonce}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_defaults_are_written_once() {
        let dir = ConfigDir::resolve(Some(&scratch_dir("init")));
        let cfg = PortalConfig::load_or_init(&dir.file("portal.conf"));
        assert_eq!(cfg, PortalConfig::default());
        assert!(dir.path().join("portal.conf").exists());

        let theme = Theme::load_or_init(&dir.file("theme.conf"));
        assert_eq!(theme, Theme::default());
        let keys = Keymap::load_or_init(&dir.file("keybinds.conf"));
        assert!(!keys.keys_for(usermgmt_portal::app::keymap::KeyAction::Quit).is_empty());
        assert!(dir.path().join("keybinds.conf").exists());
        let _ = std::fs::remove_dir_all(dir.path());
    }

    #[test]
    fn test_session_survives_reload() {
        let dir = scratch_dir("session");
        let store = SessionStore::at(dir.join("session.conf"));
        assert!(store.load().is_none());
        let s = Session {
            token: "abc.def".into(),
            user_id: "42".into(),
        };
        store.save(&s).unwrap();
        assert_eq!(SessionStore::at(dir.join("session.conf")).load(), Some(s));
        store.clear().unwrap();
        assert!(store.load().is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_in_memory_store_keeps_nothing() {
        let store = SessionStore::in_memory();
        store
            .save(&Session {
                token: "t".into(),
                user_id: "u".into(),
            })
            .unwrap();
        assert!(store.load().is_none());
        assert!(store.path().is_none());
    }
}

#[cfg(test)]
mod render_tests {
    use ratatui::{Terminal, backend::TestBackend};
    use usermgmt_portal::app::{AppState, EditState, ModalState, Screen};
    use usermgmt_portal::form::EditForm;
    use usermgmt_portal::model::{Department, Status, UserRecord, UserRole};
    use usermgmt_portal::notify::Notification;
    use usermgmt_portal::ui::render;

    fn sample_user() -> UserRecord {
        UserRecord {
            id: "1".into(),
            username: "alice".into(),
            first_name: "Alice".into(),
            last_name: "Liddell".into(),
            department: Department::Mathematics,
            user_role: UserRole::Student,
            status: Status::Active,
            dob: "2001-01-01".into(),
            created_at: None,
            profile_image: Some("alice.png".into()),
        }
    }

    fn draw(app: &AppState) -> String {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).expect("create terminal");
        terminal
            .draw(|f| render(f, app))
            .expect("render frame");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_ui_render_login_smoke() {
        let app = AppState::default();
        let out = draw(&app);
        assert!(out.contains("Login"));
        assert!(out.contains("Register"));
    }

    #[test]
    fn test_ui_render_dashboard_with_modals() {
        let mut app = AppState {
            screen: Screen::Dashboard,
            ..AppState::default()
        };
        app.set_users(vec![sample_user()]);
        let out = draw(&app);
        assert!(out.contains("Total Users"));
        assert!(out.contains("alice"));
        assert!(out.contains("Showing 1 to 1 of 1 entries"));

        app.open_modal(ModalState::CreateUser { focus: 0 });
        assert!(draw(&app).contains("Add User"));

        app.open_modal(ModalState::DeleteConfirm {
            user: sample_user(),
            selected: 1,
        });
        assert!(draw(&app).contains("Alice"));

        app.open_modal(ModalState::Help { scroll: 0 });
        app.show_keybinds = true;
        app.notify(Notification::success("User deleted successfully!"));
        assert!(draw(&app).contains("User deleted successfully!"));
    }

    #[test]
    fn test_ui_render_edit_states() {
        let mut app = AppState {
            screen: Screen::EditUser { id: "1".into() },
            ..AppState::default()
        };
        assert!(draw(&app).contains("Loading user..."));
        app.edit = EditState::Loaded(EditForm::new(sample_user()));
        let out = draw(&app);
        assert!(out.contains("Liddell"));
        assert!(out.contains("uploads/alice.png"));
        app.edit = EditState::Failed("Failed to load user data: gone".into());
        assert!(draw(&app).contains("gone"));
    }

    #[test]
    fn test_ui_render_tiny_terminal_does_not_panic() {
        let backend = TestBackend::new(20, 6);
        let mut terminal = Terminal::new(backend).expect("create terminal");
        let mut app = AppState {
            screen: Screen::Dashboard,
            ..AppState::default()
        };
        app.set_users(vec![sample_user()]);
        app.open_modal(ModalState::CreateUser { focus: 3 });
        terminal
            .draw(|f| render(f, &app))
            .expect("render frame on small area");
    }
}
