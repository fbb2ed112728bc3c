// tests/config.rs
use figment::Jail;
use planpulse_access::config_loader::{load_config, AccessConfig};
use planpulse_access::{Capability, Role};
use std::io::Write;

#[test]
fn defaults_without_file() {
    Jail::expect_with(|_jail| {
        let config = load_config(None).map_err(|e| e.to_string())?;
        assert_eq!(config.access, AccessConfig::default());
        assert_eq!(config.log.level, "info");
        assert!(!config.log.json);
        Ok(())
    });
}

#[test]
fn file_overrides_merge_into_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "planpulse.toml",
            r#"
            [access.hierarchy]
            admin = 5

            [access.permissions.admin]
            admin_access = true

            [access.permissions.executive]
            delete_feature = true

            [log]
            level = "debug"
            "#,
        )?;

        let config = load_config(None).map_err(|e| e.to_string())?;
        let e = config.evaluator().map_err(|e| e.to_string())?;

        assert!(e.has_permission(Some(Role::Admin), Capability::AdminAccess));
        assert!(!e.has_permission(Some(Role::Admin), Capability::ViewRoadmap));
        assert!(e.has_permission(Some(Role::Executive), Capability::DeleteFeature));
        // untouched default entries survive the merge
        assert!(e.has_permission(Some(Role::Executive), Capability::CreateGoal));
        assert!(e.has_role(Some(Role::Admin), Role::ProductManager));
        assert_eq!(config.log.level, "debug");
        Ok(())
    });
}

#[test]
fn env_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("planpulse.toml", "[access.hierarchy]\ncustomer = 2\n")?;
        jail.set_env("PLANPULSE_ACCESS__HIERARCHY__CUSTOMER", "9");

        let config = load_config(None).map_err(|e| e.to_string())?;
        let e = config.evaluator().map_err(|e| e.to_string())?;
        assert_eq!(e.level(Role::Customer), 9);
        assert!(e.has_role(Some(Role::Customer), Role::ProductManager));
        Ok(())
    });
}

#[test]
fn typo_in_file_fails_to_load() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "planpulse.toml",
            "[access.permissions.customer]\ncreate_gaol = true\n",
        )?;
        let err = load_config(None).expect_err("typo must not load");
        assert!(err.to_string().contains("create_gaol"), "got: {err}");
        Ok(())
    });
}

#[test]
fn kebab_case_role_key_is_rejected_not_merged() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "planpulse.toml",
            "[access.permissions.product-manager]\ndelete_feature = false\n",
        )?;
        let err = load_config(None).expect_err("non-canonical role key must not load");
        assert!(err.to_string().contains("product-manager"), "got: {err}");
        Ok(())
    });
}

#[test]
fn mixed_case_capability_key_is_rejected_not_merged() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "planpulse.toml",
            "[access.permissions.customer]\nView_Roadmap = false\n",
        )?;
        let err = load_config(None).expect_err("non-canonical capability key must not load");
        assert!(err.to_string().contains("View_Roadmap"), "got: {err}");
        Ok(())
    });
}

#[test]
fn canonical_revocation_takes_effect() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "planpulse.toml",
            "[access.permissions.product_manager]\ndelete_feature = false\n\n[access.permissions.customer]\nview_roadmap = false\n",
        )?;
        let config = load_config(None).map_err(|e| e.to_string())?;
        let e = config.evaluator().map_err(|e| e.to_string())?;
        assert!(!e.has_permission(Some(Role::ProductManager), Capability::DeleteFeature));
        assert!(!e.has_permission(Some(Role::Customer), Capability::ViewRoadmap));
        Ok(())
    });
}

#[test]
fn explicit_path_is_read() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[access.permissions.customer]\nview_analytics = true").unwrap();

    Jail::expect_with(|_jail| {
        let config = load_config(Some(file.path())).map_err(|e| e.to_string())?;
        let e = config.evaluator().map_err(|e| e.to_string())?;
        assert!(e.has_permission(Some(Role::Customer), Capability::ViewAnalytics));
        assert!(!e.has_permission(Some(Role::Customer), Capability::CreateGoal));
        Ok(())
    });
}
