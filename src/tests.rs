#[cfg(test)]
mod tests {

    mod slug_tests {
        use crate::services::slug::{ensure_unique_slug, slugify, MAX_SLUG_LENGTH};
        use std::collections::HashSet;

        fn taken(slugs: &[&str]) -> impl FnMut(&str) -> anyhow::Result<bool> {
            let set: HashSet<String> = slugs.iter().map(|s| s.to_string()).collect();
            move |candidate| Ok(set.contains(candidate))
        }

        #[test]
        fn test_slugify_basic() {
            assert_eq!(slugify("Hello World!"), "hello-world");
        }

        #[test]
        fn test_slugify_collapses_separators() {
            assert_eq!(slugify("foo_bar -- baz"), "foo-bar-baz");
            assert_eq!(slugify("Hello   World"), "hello-world");
        }

        #[test]
        fn test_slugify_strips_edges() {
            assert_eq!(slugify("  --Hello World--  "), "hello-world");
            assert_eq!(slugify("_private_"), "private");
        }

        #[test]
        fn test_slugify_drops_punctuation() {
            assert_eq!(slugify("What's new in 2024?"), "whats-new-in-2024");
            assert_eq!(slugify("C++ & Rust"), "c-rust");
        }

        #[test]
        fn test_slugify_keeps_unicode_letters() {
            assert_eq!(slugify("Café au lait"), "café-au-lait");
        }

        #[test]
        fn test_slugify_all_punctuation_is_empty() {
            assert_eq!(slugify("!!!"), "");
            assert_eq!(slugify("   "), "");
        }

        #[test]
        fn test_slugify_truncates() {
            let slug = slugify(&"a".repeat(250));
            assert_eq!(slug.chars().count(), MAX_SLUG_LENGTH);
        }

        #[test]
        fn test_slugify_truncation_does_not_leave_trailing_hyphen() {
            let title = format!("{} bcd", "a".repeat(199));
            let slug = slugify(&title);
            assert_eq!(slug, "a".repeat(199));
        }

        #[test]
        fn test_slugify_is_idempotent() {
            let long = format!("{} tail", "word ".repeat(60));
            let samples = [
                "Hello World!",
                "  Multiple   spaces\tand\nnewlines ",
                "under_scores-and--hyphens",
                "Ünïcödé Tïtle: with colon",
                "!!!",
                "Mixed CASE 123 numbers",
                long.as_str(),
            ];
            for sample in samples {
                let once = slugify(sample);
                assert_eq!(slugify(&once), once, "not idempotent for {:?}", sample);
            }
        }

        #[test]
        fn test_unique_slug_free_base() {
            let slug = ensure_unique_slug("hello-world", taken(&[])).unwrap();
            assert_eq!(slug, "hello-world");
        }

        #[test]
        fn test_unique_slug_counts_past_collisions() {
            for n in 1..=6 {
                let mut existing = vec!["hello".to_string()];
                existing.extend((2..=n).map(|i| format!("hello-{}", i)));
                let refs: Vec<&str> = existing.iter().map(String::as_str).collect();

                let slug = ensure_unique_slug("hello", taken(&refs)).unwrap();
                assert_eq!(slug, format!("hello-{}", n + 1));
            }
        }

        #[test]
        fn test_unique_slug_truncates_base_not_suffix() {
            let base = "b".repeat(MAX_SLUG_LENGTH);
            let slug = ensure_unique_slug(&base, taken(&[&base])).unwrap();
            assert_eq!(slug.chars().count(), MAX_SLUG_LENGTH);
            assert!(slug.ends_with("-2"));
            assert!(slug.starts_with(&"b".repeat(MAX_SLUG_LENGTH - 2)));
        }

        #[test]
        fn test_unique_slug_never_exceeds_limit() {
            for base_len in [1, 150, 195, 197, 198, 199, 200] {
                let base = "c".repeat(base_len);
                let mut probes = 0;
                let slug = ensure_unique_slug(&base, |candidate| {
                    assert!(candidate.chars().count() <= MAX_SLUG_LENGTH);
                    probes += 1;
                    Ok(probes <= 120)
                })
                .unwrap();
                assert!(slug.chars().count() <= MAX_SLUG_LENGTH);
                assert!(slug.ends_with("-121"));
            }
        }

        #[test]
        fn test_unique_slug_propagates_lookup_errors() {
            let result = ensure_unique_slug("hello", |_| Err(anyhow::anyhow!("db down")));
            assert!(result.is_err());
        }
    }

    mod post_tests {
        use crate::models::{
            Category, NewPost, PostDraft, PostStatus, SavedPost, Tag, UserSummary,
        };
        use crate::services::posts::{
            create_post, validate, Missing, PostError, PostLookups, PostStore, Reference,
            SaveError,
        };
        use chrono::{Duration, TimeZone, Utc};
        use std::cell::{Cell, RefCell};
        use std::collections::HashSet;

        enum SaveOutcome {
            Accept,
            SlugTaken,
            Fail,
        }

        struct MemoryStore {
            users: Vec<UserSummary>,
            categories: Vec<Category>,
            tags: Vec<Tag>,
            slugs: RefCell<HashSet<String>>,
            next_id: Cell<i64>,
            outcome: SaveOutcome,
        }

        impl MemoryStore {
            fn new() -> Self {
                let tag = |id: i64, name: &str| Tag {
                    id,
                    name: name.to_string(),
                    slug: name.to_lowercase(),
                    created_at: "2024-01-01 00:00:00".to_string(),
                };
                Self {
                    users: vec![UserSummary {
                        id: 1,
                        username: "writer".to_string(),
                        full_name: Some("Some Writer".to_string()),
                    }],
                    categories: vec![Category {
                        id: 10,
                        name: "Engineering".to_string(),
                        slug: "engineering".to_string(),
                        description: None,
                        created_at: "2024-01-01 00:00:00".to_string(),
                    }],
                    tags: vec![tag(1, "Rust"), tag(2, "Python"), tag(3, "Web")],
                    slugs: RefCell::new(HashSet::new()),
                    next_id: Cell::new(1),
                    outcome: SaveOutcome::Accept,
                }
            }

            fn with_slugs(self, slugs: &[&str]) -> Self {
                self.slugs
                    .borrow_mut()
                    .extend(slugs.iter().map(|s| s.to_string()));
                self
            }
        }

        impl PostLookups for MemoryStore {
            fn find_user(&self, id: i64) -> anyhow::Result<Option<UserSummary>> {
                Ok(self.users.iter().find(|u| u.id == id).cloned())
            }

            fn find_category(&self, id: i64) -> anyhow::Result<Option<Category>> {
                Ok(self.categories.iter().find(|c| c.id == id).cloned())
            }

            fn find_tags_by_id(&self, ids: &[i64]) -> anyhow::Result<Vec<Tag>> {
                Ok(self
                    .tags
                    .iter()
                    .filter(|t| ids.contains(&t.id))
                    .cloned()
                    .collect())
            }

            fn find_tags_by_slug(&self, slugs: &[String]) -> anyhow::Result<Vec<Tag>> {
                Ok(self
                    .tags
                    .iter()
                    .filter(|t| slugs.contains(&t.slug))
                    .cloned()
                    .collect())
            }

            fn slug_exists(&self, slug: &str) -> anyhow::Result<bool> {
                Ok(self.slugs.borrow().contains(slug))
            }
        }

        impl PostStore for MemoryStore {
            fn save(&self, post: &NewPost) -> Result<SavedPost, SaveError> {
                match self.outcome {
                    SaveOutcome::SlugTaken => return Err(SaveError::SlugTaken(post.slug.clone())),
                    SaveOutcome::Fail => return Err(anyhow::anyhow!("disk full").into()),
                    SaveOutcome::Accept => {}
                }
                if !self.slugs.borrow_mut().insert(post.slug.clone()) {
                    return Err(SaveError::SlugTaken(post.slug.clone()));
                }
                let id = self.next_id.get();
                self.next_id.set(id + 1);
                let now = Utc::now();
                Ok(SavedPost {
                    id,
                    created_at: now,
                    updated_at: now,
                })
            }
        }

        fn draft(title: &str) -> PostDraft {
            PostDraft {
                title: title.to_string(),
                ..Default::default()
            }
        }

        fn fixed_now() -> chrono::DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
        }

        #[test]
        fn test_validate_defaults_to_draft() {
            let store = MemoryStore::new();
            let fields = validate(&draft("Hello World"), &store, fixed_now()).unwrap();
            assert_eq!(fields.slug, "hello-world");
            assert_eq!(fields.status, PostStatus::Draft);
            assert!(fields.published_at.is_none());
            assert!(fields.category.is_none());
            assert!(fields.tags.is_empty());
        }

        #[test]
        fn test_validate_title_length() {
            let store = MemoryStore::new();
            for title in ["ab".to_string(), "x".repeat(201)] {
                let err = validate(&draft(&title), &store, fixed_now()).unwrap_err();
                assert!(matches!(err, PostError::FieldLength { field: "title", .. }));
            }
            assert!(validate(&draft(&"x".repeat(200)), &store, fixed_now()).is_ok());
        }

        #[test]
        fn test_validate_optional_field_lengths() {
            let store = MemoryStore::new();

            let mut input = draft("Hello World");
            input.slug = Some("ab".to_string());
            let err = validate(&input, &store, fixed_now()).unwrap_err();
            assert!(matches!(err, PostError::FieldLength { field: "slug", .. }));

            let mut input = draft("Hello World");
            input.excerpt = Some("e".repeat(1001));
            let err = validate(&input, &store, fixed_now()).unwrap_err();
            assert!(matches!(err, PostError::FieldLength { field: "excerpt", .. }));

            let mut input = draft("Hello World");
            input.featured_image = Some("i".repeat(256));
            let err = validate(&input, &store, fixed_now()).unwrap_err();
            assert!(matches!(
                err,
                PostError::FieldLength {
                    field: "featured_image",
                    ..
                }
            ));
        }

        #[test]
        fn test_validate_rejects_unknown_status() {
            let store = MemoryStore::new();
            for status in ["live", "Published", ""] {
                let mut input = draft("Hello World");
                input.status = Some(status.to_string());
                let err = validate(&input, &store, fixed_now()).unwrap_err();
                match err {
                    PostError::InvalidEnum { field, value, .. } => {
                        assert_eq!(field, "status");
                        assert_eq!(value, status);
                    }
                    other => panic!("unexpected error: {:?}", other),
                }
            }
        }

        #[test]
        fn test_validate_status_checked_before_category() {
            let store = MemoryStore::new();
            let mut input = draft("Hello World");
            input.status = Some("live".to_string());
            input.category_id = Some(999);
            let err = validate(&input, &store, fixed_now()).unwrap_err();
            assert!(matches!(err, PostError::InvalidEnum { .. }));
        }

        #[test]
        fn test_validate_resolves_category() {
            let store = MemoryStore::new();
            let mut input = draft("Hello World");
            input.category_id = Some(10);
            let fields = validate(&input, &store, fixed_now()).unwrap();
            assert_eq!(fields.category.map(|c| c.slug), Some("engineering".to_string()));
        }

        #[test]
        fn test_validate_unknown_category() {
            let store = MemoryStore::new();
            let mut input = draft("Hello World");
            input.category_id = Some(42);
            let err = validate(&input, &store, fixed_now()).unwrap_err();
            match err {
                PostError::NotFound { kind, missing } => {
                    assert_eq!(kind, Reference::Category);
                    assert_eq!(missing, Missing::Ids(vec![42]));
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }

        #[test]
        fn test_validate_slug_generation_failure() {
            let store = MemoryStore::new();
            let err = validate(&draft("!!!"), &store, fixed_now()).unwrap_err();
            assert!(matches!(err, PostError::SlugGeneration));
        }

        #[test]
        fn test_validate_explicit_slug_is_made_unique() {
            let store = MemoryStore::new().with_slugs(&["my-post", "my-post-2"]);
            let mut input = draft("Hello World");
            input.slug = Some("my-post".to_string());
            let fields = validate(&input, &store, fixed_now()).unwrap();
            assert_eq!(fields.slug, "my-post-3");
        }

        #[test]
        fn test_validate_generated_slug_collision() {
            let store = MemoryStore::new().with_slugs(&["hello-world"]);
            let fields = validate(&draft("Hello World"), &store, fixed_now()).unwrap();
            assert_eq!(fields.slug, "hello-world-2");
        }

        #[test]
        fn test_validate_published_fills_published_at() {
            let store = MemoryStore::new();
            let mut input = draft("Hello World");
            input.status = Some("published".to_string());
            let fields = validate(&input, &store, fixed_now()).unwrap();
            assert_eq!(fields.status, PostStatus::Published);
            assert_eq!(fields.published_at, Some(fixed_now()));
        }

        #[test]
        fn test_validate_published_keeps_given_published_at() {
            let store = MemoryStore::new();
            let given = fixed_now() - Duration::days(3);
            let mut input = draft("Hello World");
            input.status = Some("published".to_string());
            input.published_at = Some(given);
            let fields = validate(&input, &store, fixed_now()).unwrap();
            assert_eq!(fields.published_at, Some(given));
        }

        #[test]
        fn test_validate_draft_with_published_at_is_inconsistent() {
            let store = MemoryStore::new();
            for status in [None, Some("draft"), Some("archived")] {
                let mut input = draft("Hello World");
                input.status = status.map(String::from);
                input.published_at = Some(fixed_now());
                let err = validate(&input, &store, fixed_now()).unwrap_err();
                assert!(matches!(err, PostError::InconsistentState { .. }));
                assert_eq!(err.field(), Some("published_at"));
            }
        }

        #[test]
        fn test_validate_resolves_tag_ids() {
            let store = MemoryStore::new();
            let mut input = draft("Hello World");
            input.tag_ids = Some(vec![1, 3]);
            let fields = validate(&input, &store, fixed_now()).unwrap();
            let ids: Vec<i64> = fields.tags.iter().map(|t| t.id).collect();
            assert_eq!(ids, vec![1, 3]);
        }

        #[test]
        fn test_validate_unknown_tag_ids() {
            let store = MemoryStore::new();
            let mut input = draft("Hello World");
            input.tag_ids = Some(vec![1, 2, 999]);
            let err = validate(&input, &store, fixed_now()).unwrap_err();
            match err {
                PostError::NotFound { kind, missing } => {
                    assert_eq!(kind, Reference::TagIds);
                    assert_eq!(missing, Missing::Ids(vec![999]));
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }

        #[test]
        fn test_validate_missing_tag_ids_are_sorted_and_deduplicated() {
            let store = MemoryStore::new();
            let mut input = draft("Hello World");
            input.tag_ids = Some(vec![999, 1, 50, 999, 7]);
            let err = validate(&input, &store, fixed_now()).unwrap_err();
            match err {
                PostError::NotFound { missing, .. } => {
                    assert_eq!(missing, Missing::Ids(vec![7, 50, 999]));
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }

        #[test]
        fn test_validate_unknown_tag_slugs() {
            let store = MemoryStore::new();
            let mut input = draft("Hello World");
            input.tag_slugs = Some(vec![
                "rust".to_string(),
                "zig".to_string(),
                "go".to_string(),
            ]);
            let err = validate(&input, &store, fixed_now()).unwrap_err();
            match err {
                PostError::NotFound { kind, missing } => {
                    assert_eq!(kind, Reference::TagSlugs);
                    assert_eq!(
                        missing,
                        Missing::Slugs(vec!["go".to_string(), "zig".to_string()])
                    );
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }

        #[test]
        fn test_validate_tag_ids_take_precedence_over_slugs() {
            let store = MemoryStore::new();
            let mut input = draft("Hello World");
            input.tag_ids = Some(vec![2]);
            input.tag_slugs = Some(vec!["does-not-exist".to_string()]);
            let fields = validate(&input, &store, fixed_now()).unwrap();
            assert_eq!(fields.tags.len(), 1);
            assert_eq!(fields.tags[0].slug, "python");
        }

        #[test]
        fn test_validate_empty_tag_list() {
            let store = MemoryStore::new();
            let mut input = draft("Hello World");
            input.tag_slugs = Some(Vec::new());
            let err = validate(&input, &store, fixed_now()).unwrap_err();
            assert!(matches!(err, PostError::EmptyList { field: "tag_slugs" }));
        }

        #[test]
        fn test_create_post_end_to_end() {
            let store = MemoryStore::new();
            let mut input = draft("Hello World");
            input.status = Some("draft".to_string());
            let post = create_post(input, 1, &store, &store).unwrap();

            assert_eq!(post.slug, "hello-world");
            assert_eq!(post.status, PostStatus::Draft);
            assert!(post.tags.is_empty());
            assert!(post.category.is_none());
            assert!(post.published_at.is_none());
            assert_eq!(post.view_count, 0);
            assert_eq!(post.author.map(|a| a.username), Some("writer".to_string()));
        }

        #[test]
        fn test_create_post_published_at_is_now() {
            let store = MemoryStore::new();
            let mut input = draft("Fresh News");
            input.status = Some("published".to_string());
            let before = Utc::now();
            let post = create_post(input, 1, &store, &store).unwrap();
            let after = Utc::now();

            let published_at = post.published_at.expect("published_at should be set");
            assert!(published_at >= before && published_at <= after);
        }

        #[test]
        fn test_create_post_unknown_author() {
            let store = MemoryStore::new();
            let err = create_post(draft("Hello World"), 77, &store, &store).unwrap_err();
            assert!(matches!(err, PostError::AuthorNotFound(77)));
        }

        #[test]
        fn test_create_post_second_identical_title_gets_suffix() {
            let store = MemoryStore::new();
            let first = create_post(draft("Hello World"), 1, &store, &store).unwrap();
            let second = create_post(draft("Hello World"), 1, &store, &store).unwrap();
            assert_eq!(first.slug, "hello-world");
            assert_eq!(second.slug, "hello-world-2");
            assert_ne!(first.id, second.id);
        }

        #[test]
        fn test_create_post_reports_lost_race_as_conflict() {
            let mut store = MemoryStore::new();
            store.outcome = SaveOutcome::SlugTaken;
            let err = create_post(draft("Hello World"), 1, &store, &store).unwrap_err();
            match err {
                PostError::SlugConflict(slug) => assert_eq!(slug, "hello-world"),
                other => panic!("unexpected error: {:?}", other),
            }
        }

        #[test]
        fn test_create_post_wraps_storage_failures() {
            let mut store = MemoryStore::new();
            store.outcome = SaveOutcome::Fail;
            let err = create_post(draft("Hello World"), 1, &store, &store).unwrap_err();
            assert!(matches!(err, PostError::Internal(_)));
            assert_eq!(err.field(), None);
        }

        #[test]
        fn test_draft_status_may_be_omitted_but_not_null() {
            let omitted: PostDraft = serde_json::from_str(r#"{"title": "Hello World"}"#).unwrap();
            assert!(omitted.status.is_none());

            let given: PostDraft =
                serde_json::from_str(r#"{"title": "Hello World", "status": "archived"}"#).unwrap();
            assert_eq!(given.status.as_deref(), Some("archived"));

            let null = serde_json::from_str::<PostDraft>(r#"{"title": "Hello World", "status": null}"#);
            assert!(null.is_err());
        }

        #[test]
        fn test_missing_references_display() {
            let err = PostError::NotFound {
                kind: Reference::TagIds,
                missing: Missing::Ids(vec![7, 999]),
            };
            assert_eq!(err.to_string(), "unknown tag_ids: 7, 999");
            assert_eq!(
                serde_json::to_value(Missing::Ids(vec![7, 999])).unwrap(),
                serde_json::json!([7, 999])
            );
        }

        #[test]
        fn test_status_round_trip_names() {
            for name in PostStatus::ALLOWED {
                let status: PostStatus = name.parse().unwrap();
                assert_eq!(status.to_string(), name);
            }
        }
    }

    mod auth_tests {
        use crate::services::auth::{
            generate_session_token, hash_password, validate_password, verify_password,
        };

        #[test]
        fn test_hash_and_verify() {
            let hash = hash_password("Password123").unwrap();
            assert_ne!(hash, "Password123");
            assert!(hash.starts_with("$argon2"));
            assert!(verify_password("Password123", &hash));
            assert!(!verify_password("Password124", &hash));
        }

        #[test]
        fn test_verify_rejects_garbage_hash() {
            assert!(!verify_password("Password123", "UNUSABLE_PASSWORD"));
            assert!(!verify_password("Password123", ""));
        }

        #[test]
        fn test_password_rules() {
            assert!(validate_password("Password123").is_ok());
            assert!(validate_password("Pass1").is_err());
            assert!(validate_password("password123").is_err());
            assert!(validate_password("PASSWORD123").is_err());
            assert!(validate_password("Passwordxyz").is_err());
        }

        #[test]
        fn test_session_tokens_are_unique() {
            let a = generate_session_token();
            let b = generate_session_token();
            assert_ne!(a, b);
            assert_eq!(a.len(), 43);
        }
    }

    mod config_tests {
        use crate::config::MAX_SESSION_DAYS;
        use crate::Config;

        const MINIMAL: &str = r#"
[site]
title = "Portfolio Blog"

[database]
path = "./data/folio.db"
"#;

        #[test]
        fn test_minimal_config_uses_defaults() {
            let config = Config::from_toml(MINIMAL).unwrap();
            assert_eq!(config.server.host, "127.0.0.1");
            assert_eq!(config.server.port, 8000);
            assert_eq!(config.database.pool_size, 10);
            assert_eq!(config.auth.session_days().unwrap(), 7);
            assert!(!config.auth.secure_cookies);
        }

        #[test]
        fn test_session_lifetime_formats() {
            let mut config = Config::from_toml(MINIMAL).unwrap();
            for (raw, days) in [("7d", 7), ("2w", 14), ("30", 30), (" 3d ", 3)] {
                config.auth.session_lifetime = raw.to_string();
                assert_eq!(config.auth.session_days().unwrap(), days, "{}", raw);
            }
            for raw in ["", "d", "soon", "0d", "-1d"] {
                config.auth.session_lifetime = raw.to_string();
                assert!(config.auth.session_days().is_err(), "{}", raw);
            }
        }

        #[test]
        fn test_session_lifetime_upper_bound() {
            let mut config = Config::from_toml(MINIMAL).unwrap();
            config.auth.session_lifetime = format!("{}d", MAX_SESSION_DAYS);
            let days = config.auth.session_days().unwrap();
            assert_eq!(days, MAX_SESSION_DAYS);
            assert!(std::panic::catch_unwind(|| time::Duration::days(days)).is_ok());

            for raw in ["3651d", "522w", "200000000000000d", "1317624576693539402w"] {
                config.auth.session_lifetime = raw.to_string();
                assert!(config.auth.session_days().is_err(), "{}", raw);
            }

            let toml = format!("{}\n[auth]\nsession_lifetime = \"200000000000000d\"\n", MINIMAL);
            assert!(Config::from_toml(&toml).is_err());
        }

        #[test]
        fn test_rejects_empty_title() {
            let toml = MINIMAL.replace("Portfolio Blog", " ");
            assert!(Config::from_toml(&toml).is_err());
        }

        #[test]
        fn test_rejects_zero_pool() {
            let toml = format!("{}pool_size = 0\n", MINIMAL);
            assert!(Config::from_toml(&toml).is_err());
        }
    }

    mod security_tests {
        use crate::web::security::LoginThrottle;
        use std::time::Duration;

        #[test]
        fn test_throttle_blocks_after_max_failures() {
            let throttle = LoginThrottle::new(3, Duration::from_secs(60));
            for _ in 0..3 {
                assert!(throttle.allows("writer"));
                throttle.record_failure("writer");
            }
            assert!(!throttle.allows("writer"));
            assert!(throttle.allows("someone-else"));
        }

        #[test]
        fn test_throttle_clear_resets() {
            let throttle = LoginThrottle::new(1, Duration::from_secs(60));
            throttle.record_failure("writer");
            assert!(!throttle.allows("writer"));
            throttle.clear("writer");
            assert!(throttle.allows("writer"));
        }

        #[test]
        fn test_throttle_window_expires() {
            let throttle = LoginThrottle::new(1, Duration::from_millis(0));
            throttle.record_failure("writer");
            assert!(throttle.allows("writer"));
            assert_eq!(throttle.tracked_keys(), 0);
        }

        #[test]
        fn test_throttle_cleanup_forgets_expired_keys() {
            let throttle = LoginThrottle::new(5, Duration::from_millis(0));
            for i in 0..10_000 {
                throttle.record_failure(&format!("user-{}", i));
            }
            assert_eq!(throttle.tracked_keys(), 10_000);

            throttle.cleanup();
            assert_eq!(throttle.tracked_keys(), 0);
        }

        #[test]
        fn test_throttle_cleanup_keeps_recent_failures() {
            let throttle = LoginThrottle::new(2, Duration::from_secs(60));
            throttle.record_failure("writer");
            throttle.record_failure("writer");
            throttle.cleanup();
            assert_eq!(throttle.tracked_keys(), 1);
            assert!(!throttle.allows("writer"));
        }
    }
}
