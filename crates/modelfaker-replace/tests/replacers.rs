use std::collections::HashSet;

use modelfaker_core::{Record, Value};
use modelfaker_replace::catalog::{COMPANIES, COMPANY_SUFFIXES, MAIL_EXTS};
use modelfaker_replace::{
    BuiltReplacer, CallbackReplacer, ChoiceReplacer, ChoiceUniqueReplacer, CompanyEmailReplacer,
    CompanyReplacer, CompanyWebsiteReplacer, EmailReplacer, FakeReplacer, LazyEmailReplacer,
    LazyPasswordReplacer, LazyReplacer, LazyUsernameReplacer, PhoneReplacer, ReplaceError,
    Replacer, ReplacerSpec, SerialReplacer, TextReplacer, check_password,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

fn person() -> Record {
    Record::new("crm.Contact", 1)
        .with_field("first_name", "Jean Pierre")
        .with_field("last_name", "Dupont")
        .with_field("company", "Acme Labs")
}

fn text(value: Value) -> String {
    value.as_str().map(str::to_string).unwrap_or_default()
}

#[test]
fn choice_picks_from_configured_set() {
    let mut rng = rng();
    let mut replacer = ChoiceReplacer::new(["a", "b"]).expect("non-empty");
    for _ in 0..20 {
        let value = text(replacer.apply(&mut rng).expect("value"));
        assert!(value == "a" || value == "b");
    }
}

#[test]
fn choice_rejects_empty_set() {
    let result = ChoiceReplacer::new(Vec::<Value>::new());
    assert!(matches!(result, Err(ReplaceError::EmptyChoices)));
}

#[test]
fn choice_unique_never_repeats_and_then_underflows() {
    let mut rng = rng();
    let mut replacer = ChoiceUniqueReplacer::new(["a", "b", "c"]).with_shuffle(true);
    let mut seen = HashSet::new();
    for _ in 0..3 {
        let value = text(replacer.apply(&mut rng).expect("value"));
        assert!(seen.insert(value));
    }
    assert_eq!(replacer.remaining(), 0);
    assert!(matches!(
        replacer.apply(&mut rng),
        Err(ReplaceError::Exhausted { picked: 3 })
    ));
}

#[test]
fn choice_unique_without_shuffle_pops_from_the_end() {
    let mut rng = rng();
    let mut replacer = ChoiceUniqueReplacer::new(["first", "last"]);
    assert_eq!(text(replacer.apply(&mut rng).expect("value")), "last");
    assert_eq!(text(replacer.apply(&mut rng).expect("value")), "first");
}

#[test]
fn company_combines_both_pools() {
    let mut rng = rng();
    let mut replacer = CompanyReplacer::new();
    for _ in 0..10 {
        let value = text(replacer.apply(&mut rng).expect("value"));
        let (left, right) = value.split_once(' ').expect("two tokens");
        let forward = COMPANIES.contains(&left) && COMPANY_SUFFIXES.contains(&right);
        let reversed = COMPANY_SUFFIXES.contains(&left) && COMPANIES.contains(&right);
        assert!(forward || reversed, "unexpected company '{value}'");
    }
}

#[test]
fn email_and_phone_have_expected_shapes() {
    let mut rng = rng();
    let email = text(EmailReplacer.apply(&mut rng).expect("value"));
    assert!(email.ends_with(".example.com"));
    assert!(email.contains('@'));

    let phone = text(PhoneReplacer.apply(&mut rng).expect("value"));
    assert!(phone.starts_with("(+33)"));
    assert_eq!(phone.len(), "(+33)".len() + 9);
    assert!(phone["(+33)".len()..].chars().all(|ch| ch.is_ascii_digit()));
}

#[test]
fn serial_respects_length_and_alphabet() {
    let mut rng = rng();
    let hex = text(SerialReplacer::default().apply(&mut rng).expect("value"));
    assert_eq!(hex.len(), 12);
    assert!(hex.chars().all(|ch| ch.is_ascii_hexdigit() && !ch.is_ascii_lowercase()));

    let digits = text(SerialReplacer::new(8, true).apply(&mut rng).expect("value"));
    assert!(digits.len() <= 8);
    assert!(digits.chars().all(|ch| ch.is_ascii_digit()));
}

#[test]
fn fake_adapter_rejects_unknown_ids() {
    assert!(matches!(
        FakeReplacer::new("spaceship"),
        Err(ReplaceError::UnknownGenerator(_))
    ));
    let mut rng = rng();
    let mut replacer = FakeReplacer::new("first_name").expect("known id");
    assert!(!text(replacer.apply(&mut rng).expect("value")).is_empty());
}

#[test]
fn text_reads_already_replaced_fields() {
    let mut rng = rng();
    let record = Record::new("app.A", 1).with_field("prop_x", "Jack");
    let mut named = TextReplacer::new("Hello {prop_x}").expect("template");
    let mut positional = TextReplacer::with_tokens("Hello {0}", ["prop_x"]).expect("template");
    assert_eq!(text(named.apply(&record, &mut rng).expect("value")), "Hello Jack");
    assert_eq!(
        text(positional.apply(&record, &mut rng).expect("value")),
        "Hello Jack"
    );
}

#[test]
fn lazy_identity_replacers_slugify_fields() {
    let mut rng = rng();
    let record = person();

    let username = LazyUsernameReplacer::new("first_name", "last_name")
        .apply(&record, &mut rng)
        .expect("value");
    assert_eq!(text(username), "jean-pierre.dupont");

    let email = text(
        LazyEmailReplacer::new("first_name", "last_name")
            .apply(&record, &mut rng)
            .expect("value"),
    );
    let (local, domain) = email.split_once('@').expect("email");
    assert_eq!(local, "jean-pierre.dupont");
    let ext = domain.strip_suffix(".example.com").expect("example domain");
    assert!(MAIL_EXTS.contains(&ext));

    let website = CompanyWebsiteReplacer::new("company")
        .apply(&record, &mut rng)
        .expect("value");
    assert_eq!(text(website), "acme-labs.example.com");

    let company_email = CompanyEmailReplacer::new("first_name", "last_name", "company")
        .apply(&record, &mut rng)
        .expect("value");
    assert_eq!(text(company_email), "jean-pierre.dupont@acme-labs.example.com");
}

#[test]
fn lazy_password_hashes_initials() {
    let mut rng = rng();
    let hashed = LazyPasswordReplacer::new("first_name", "last_name")
        .with_iterations(1_000)
        .apply(&person(), &mut rng)
        .expect("value");
    let hashed = text(hashed);
    assert!(hashed.starts_with("pbkdf2_sha256$1000$"));
    assert!(check_password("JD", &hashed));
}

#[test]
fn lazy_password_initial_comes_from_the_uppercased_text() {
    let mut rng = rng();
    let record = Record::new("auth.User", 1)
        .with_field("first_name", "ßen")
        .with_field("last_name", "doe");
    let hashed = LazyPasswordReplacer::new("first_name", "last_name")
        .with_iterations(1_000)
        .apply(&record, &mut rng)
        .expect("value");
    let hashed = text(hashed);
    assert!(check_password("SD", &hashed));
    assert!(!check_password("SSD", &hashed));
}

#[test]
fn lazy_replacers_report_missing_fields() {
    let mut rng = rng();
    let record = Record::new("crm.Contact", 1).with_field("first_name", "Ann");
    let result = LazyUsernameReplacer::new("first_name", "last_name").apply(&record, &mut rng);
    assert!(matches!(result, Err(ReplaceError::MissingField(field)) if field == "last_name"));

    let record = record.with_field("last_name", "");
    let result = LazyPasswordReplacer::new("first_name", "last_name")
        .with_iterations(1)
        .apply(&record, &mut rng);
    assert!(matches!(result, Err(ReplaceError::EmptyField(field)) if field == "last_name"));
}

#[test]
fn callback_receives_the_record() {
    let mut rng = rng();
    let mut replacer = CallbackReplacer::new(|record: &Record| {
        Ok(Value::Int(record.id as i64 * 10))
    });
    assert_eq!(
        replacer.apply(&person(), &mut rng).expect("value"),
        Value::Int(10)
    );
}

#[test]
fn specs_deserialize_from_toml_and_build() {
    let specs: Vec<ReplacerSpec> = toml::from_str::<toml::Table>(
        r#"
        specs = [
          { replacer = "choice", choices = ["Jack"] },
          { replacer = "serial" },
          { replacer = "text", template = "Hello {0}", fields = ["prop_x"] },
        ]
        "#,
    )
    .expect("toml")
    .remove("specs")
    .expect("specs key")
    .try_into()
    .expect("specs");

    assert_eq!(
        specs[1],
        ReplacerSpec::Serial {
            len: 12,
            int_only: false
        }
    );
    let built: Vec<BuiltReplacer> = specs
        .iter()
        .map(|spec| spec.build().expect("build"))
        .collect();
    assert!(matches!(built[0], BuiltReplacer::Simple(_)));
    assert!(matches!(built[2], BuiltReplacer::Lazy(_)));
    assert_eq!(built[2].id(), "text");
}

#[test]
fn spec_build_surfaces_configuration_errors() {
    let spec: ReplacerSpec =
        serde_json::from_str(r#"{"replacer": "choice", "choices": []}"#).expect("json");
    assert!(matches!(spec.build(), Err(ReplaceError::EmptyChoices)));

    let spec: ReplacerSpec =
        serde_json::from_str(r#"{"replacer": "serial", "len": 0}"#).expect("json");
    assert!(matches!(spec.build(), Err(ReplaceError::Invalid(_))));
}

#[test]
fn misspelled_replacer_options_are_rejected() {
    let result = serde_json::from_str::<ReplacerSpec>(
        r#"{"replacer": "choice_unique", "choices": ["a", "b"], "shufle": true}"#,
    );
    assert!(result.is_err());

    let spec: ReplacerSpec = serde_json::from_str(
        r#"{"replacer": "choice_unique", "choices": ["a", "b"], "shuffle": true}"#,
    )
    .expect("json");
    assert_eq!(
        spec,
        ReplacerSpec::ChoiceUnique {
            choices: vec![Value::from("a"), Value::from("b")],
            shuffle: true,
        }
    );
}
