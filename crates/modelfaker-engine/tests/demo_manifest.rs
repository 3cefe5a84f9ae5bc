use std::path::PathBuf;

use modelfaker_core::MemoryStore;
use modelfaker_engine::{
    FakerSettings, ManifestSource, NoopObserver, RunOptions, Scope, fake_scope,
};
use modelfaker_replace::check_password;

fn demo_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

#[test]
fn demo_manifest_fakes_demo_dataset() {
    let source = ManifestSource::load(&demo_path("fakers.toml")).expect("load manifest");
    assert_eq!(source.specs().len(), 3);
    let mut store = MemoryStore::load_json(&demo_path("dataset.json")).expect("load dataset");
    let settings = FakerSettings {
        max_tries: 3,
        seed: Some(2024),
    };

    let report = fake_scope(
        &source,
        &Scope::new(Some("crm"), None).expect("scope"),
        &mut store,
        &settings,
        &NoopObserver,
        RunOptions::default(),
    )
    .expect("fake demo");

    assert_eq!(report.declarations.len(), 3);
    assert_eq!(store.ids("User"), [1, 3]);

    for id in store.ids("User") {
        let user = store.get("User", id).expect("user");
        assert_ne!(user.get_str("email"), Some("alice@corp.fr"));
        let first = user.get_str("first_name").expect("first name");
        let last = user.get_str("last_name").expect("last name");
        let raw: String = [first, last]
            .iter()
            .filter_map(|name| name.chars().next())
            .flat_map(char::to_uppercase)
            .collect();
        assert!(check_password(&raw, user.get_str("password").expect("password")));
    }

    let company = store.get("Company", 1).expect("company");
    let siret = company.get_str("siret").expect("siret");
    assert!(siret.len() <= 14 && siret.chars().all(|ch| ch.is_ascii_digit()));
    assert!(
        company
            .get_str("website")
            .is_some_and(|site| site.ends_with(".example.com"))
    );

    let faked = store.get("Contact", 1).expect("contact 1");
    assert!(faked.get_str("phone").is_some_and(|phone| phone.starts_with("(+33)")));
    assert_eq!(faked.get("verified").and_then(|value| value.as_bool()), Some(false));
    let kept = store.get("Contact", 2).expect("contact 2");
    assert_eq!(kept.get_str("email"), Some("marc@other.fr"));
}
