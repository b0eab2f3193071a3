//! Routing-core integration tests: planner scenarios over a realistic
//! configuration and the build-path/match round-trip property.

use std::sync::Arc;

use locale_gateway::config::schema::GatewayConfig;
use locale_gateway::config::validation::build_routing;
use locale_gateway::routing::{
    Directive, NavigationBuilder, Params, PathMatcher, PathnameTable, LocaleRegistry,
    RequestPlanner,
};

fn config() -> GatewayConfig {
    toml::from_str(
        r#"
        [locales]
        supported = ["ru", "en", "de"]
        default = "ru"

        [[pathnames]]
        canonical = "/"

        [[pathnames]]
        canonical = "/pathnames"
        [pathnames.locales]
        ru = "/pathnames"
        en = "/pathnames"
        de = "/pfadnamen"

        [[pathnames]]
        canonical = "/news/:id"
        [pathnames.locales]
        ru = "/news/:id"
        en = "/news/:id"
        de = "/nachrichten/:id"
        "#,
    )
    .unwrap()
}

fn routing() -> (Arc<LocaleRegistry>, Arc<PathnameTable>) {
    build_routing(&config()).unwrap()
}

fn planner() -> RequestPlanner {
    let (registry, table) = routing();
    RequestPlanner::new(registry, table)
}

#[test]
fn negotiated_locale_redirects_to_localized_alias() {
    // "/pathnames" with no cookie and Accept-Language "de".
    match planner().plan("/pathnames", None, Some("de")) {
        Directive::Redirect(plan) => {
            assert_eq!(plan.target, "/de/pfadnamen");
            assert_eq!(plan.status, 308);
            assert_eq!(
                plan.set_locale_cookie.as_ref().map(|l| l.as_str()),
                Some("de")
            );
        }
        other => panic!("expected redirect, got {other:?}"),
    }
}

#[test]
fn canonical_paths_rewrite_without_redirect() {
    match planner().plan("/de/pfadnamen", None, None) {
        Directive::Rewrite(plan) => {
            assert_eq!(plan.canonical_id, "/pathnames");
            assert_eq!(plan.locale.as_str(), "de");
        }
        other => panic!("expected rewrite, got {other:?}"),
    }

    match planner().plan("/ru/", None, None) {
        Directive::Rewrite(plan) => {
            assert_eq!(plan.canonical_id, "/");
            assert_eq!(plan.locale.as_str(), "ru");
        }
        other => panic!("expected rewrite, got {other:?}"),
    }
}

#[test]
fn parameterized_routes_carry_their_bindings() {
    match planner().plan("/de/nachrichten/42", None, None) {
        Directive::Rewrite(plan) => {
            assert_eq!(plan.canonical_id, "/news/:id");
            assert_eq!(plan.params.get("id").map(String::as_str), Some("42"));
        }
        other => panic!("expected rewrite, got {other:?}"),
    }

    // Foreign alias with a parameter still redirects to the locale's own
    // form, parameter preserved.
    match planner().plan("/de/news/42", None, None) {
        Directive::Redirect(plan) => assert_eq!(plan.target, "/de/nachrichten/42"),
        other => panic!("expected redirect, got {other:?}"),
    }
}

#[test]
fn unsupported_prefix_is_an_ordinary_segment() {
    assert_eq!(planner().plan("/fr/about", None, None), Directive::NotFound);
    assert_eq!(planner().plan("/fr/pathnames", None, None), Directive::NotFound);
}

#[test]
fn redirect_targets_always_rewrite_on_replan() {
    let planner = planner();
    let inputs = [
        ("/", None, None),
        ("/pathnames", None, Some("de")),
        ("/news/7", Some("en"), None),
        ("/de/pathnames", None, None),
        ("/en/pfadnamen", None, None),
        ("/en/nachrichten/9", None, Some("ru")),
    ];

    for (path, cookie, header) in inputs {
        if let Directive::Redirect(plan) = planner.plan(path, cookie, header) {
            let replanned = planner.plan(&plan.target, cookie, header);
            assert!(
                matches!(replanned, Directive::Rewrite(_)),
                "{path} redirected to {}, which must rewrite but got {replanned:?}",
                plan.target
            );
        }
    }
}

#[test]
fn build_path_then_match_round_trips() {
    let (registry, table) = routing();
    let navigation = NavigationBuilder::new(Arc::clone(&registry), Arc::clone(&table));
    let matcher = PathMatcher::new(Arc::clone(&registry), Arc::clone(&table));

    for locale in registry.supported() {
        for entry in table.entries() {
            let params: Params = entry
                .canonical_pattern()
                .param_names()
                .iter()
                .map(|name| (name.to_string(), "42".to_string()))
                .collect();

            let built = navigation
                .build_path(entry.canonical_id(), locale.as_str(), &params)
                .unwrap();

            let stripped = built
                .strip_prefix(&format!("/{}", locale.as_str()))
                .unwrap_or(&built);
            let stripped = if stripped.is_empty() { "/" } else { stripped };

            let matched = matcher.match_path(stripped, locale).unwrap();
            assert_eq!(matched.canonical_id, entry.canonical_id());
            assert_eq!(matched.params, params);
            assert!(matched.is_locale_form, "{built} must match its own locale form");
        }
    }
}

#[test]
fn directives_serialize_for_the_cli() {
    let directive = planner().plan("/pathnames", None, Some("de"));
    let json = serde_json::to_value(&directive).unwrap();
    assert_eq!(json["kind"], "redirect");
    assert_eq!(json["target"], "/de/pfadnamen");
    assert_eq!(json["status"], 308);
    assert_eq!(json["set_locale_cookie"], "de");

    let directive = planner().plan("/en/news/42", None, None);
    let json = serde_json::to_value(&directive).unwrap();
    assert_eq!(json["kind"], "rewrite");
    assert_eq!(json["canonical_id"], "/news/:id");
    assert_eq!(json["params"]["id"], "42");
}
