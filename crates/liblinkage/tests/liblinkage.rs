use liblinkage::prelude::*;
use serde_json::json;

fn linker() -> Linker {
  Linker::new(LinkageConfig::default()).build().unwrap()
}

#[test]
fn exact_and_case_insensitive_fields() {
  let left = Dataset::builder()
    .columns(&[("email", "varchar"), ("full_name", "varchar")])
    .rows(&[&[("email", json!("a@x.com")), ("full_name", json!("John Smith"))]])
    .build();
  let right = Dataset::builder()
    .columns(&[("user_email", "varchar"), ("name", "varchar")])
    .rows(&[&[("user_email", json!("a@x.com")), ("name", json!("JOHN SMITH"))]])
    .build();

  let matches = linker().find_matches(&left, &right).unwrap();

  assert_eq!(matches.len(), 1);
  assert_eq!(matches.pairs[0].score, 100.0);

  assert_eq!(
    serde_json::to_value(&matches.pairs[0]).unwrap(),
    json!({
      "table1_id": 0,
      "table2_id": 0,
      "similarity_score": 100.0,
      "table1_email": "a@x.com",
      "table1_full_name": "John Smith",
      "table2_user_email": "a@x.com",
      "table2_name": "JOHN SMITH",
    })
  );
}

#[test]
fn unclassified_columns_never_match() {
  let left = Dataset::builder()
    .columns(&[("city", "varchar"), ("notes", "text")])
    .rows(&[&[("city", json!("Paris")), ("notes", json!("same"))]])
    .build();
  let right = Dataset::builder()
    .columns(&[("city", "varchar"), ("notes", "text")])
    .rows(&[&[("city", json!("Paris")), ("notes", json!("same"))]])
    .build();

  let matches = linker().find_matches(&left, &right).unwrap();

  assert!(matches.is_empty());
  assert!(matches.left_columns.iter().all(|column| column.category == Category::Other));
}

#[test]
fn single_field_below_threshold() {
  let left = Dataset::builder().columns(&[("full_name", "varchar")]).rows(&[&[("full_name", json!("kitten"))]]).build();
  let right = Dataset::builder().columns(&[("name", "varchar")]).rows(&[&[("name", json!("sitting"))]]).build();

  assert!(linker().find_matches(&left, &right).unwrap().is_empty());

  let lenient = linker().with_config(LinkageConfig::default().with_threshold(60.0)).unwrap();
  let matches = lenient.find_matches(&left, &right).unwrap();

  assert_eq!(matches.len(), 1);
  assert_eq!(matches.pairs[0].score, 62.0);
}

#[test]
fn raising_threshold_only_removes_pairs() {
  let (left, right) = liblinkage_fixtures();
  let mut previous: Option<Vec<(usize, usize)>> = None;

  for threshold in [100.0, 95.0, 90.0, 85.0, 75.0, 60.0, 40.0] {
    let linker = Linker::new(LinkageConfig::default().with_threshold(threshold)).build().unwrap();
    let matches = linker.find_matches(&left, &right).unwrap();
    let ids = matches.iter().map(|pair| (pair.left_id, pair.right_id)).collect::<Vec<_>>();

    assert!(matches.iter().all(|pair| pair.score >= threshold));

    if let Some(stricter) = &previous {
      assert!(stricter.iter().all(|id| ids.contains(id)), "threshold {threshold} lost pairs found at a stricter threshold");
    }

    previous = Some(ids);
  }
}

#[test]
fn empty_inputs() {
  let left = Dataset::builder().columns(&[("email", "varchar")]).build();
  let right = Dataset::builder().columns(&[("user_email", "varchar")]).rows(&[&[("user_email", json!("a@x.com"))]]).build();

  let matches = linker().find_matches(&left, &right).unwrap();

  assert!(matches.is_empty());
  assert_eq!(matches.left_columns.len(), 1);
}

#[test]
fn classifier_precedence() {
  let linker = linker();

  for column in ["ssn", "Passport_Number", "user_email", "PHONE", "zip_code", "first_name", "created_at", ""] {
    assert_eq!(linker.classify(column), linker.classify(column));
  }

  assert_eq!(linker.classify("passport_name"), Category::Identity);
  assert_eq!(linker.classify("email_address"), Category::Contact);
  assert_eq!(linker.classify("customer_name"), Category::Name);
  assert_eq!(linker.classify("created_at"), Category::Other);
  assert_eq!(linker.classify(""), Category::Other);
}

#[test]
fn custom_category_table() {
  let config = LinkageConfig::from_yaml(
    r#"
      threshold: 90
      categories:
        - category: name
          weight: 1.0
          patterns: [name]
        - category: contact
          weight: 0.5
          patterns: [mail]
    "#,
  )
  .unwrap();

  let linker = Linker::new(config).build().unwrap();

  assert_eq!(linker.classify("email_name"), Category::Name);
  assert_eq!(linker.classify("ssn"), Category::Other);
  assert_eq!(linker.config().threshold, 90.0);
}

fn liblinkage_fixtures() -> (Dataset, Dataset) {
  let left = Dataset::builder()
    .columns(&[("email", "varchar"), ("full_name", "varchar")])
    .rows(&[
      &[("email", json!("john.smith@example.com")), ("full_name", json!("John Smith"))],
      &[("email", json!("jane.doe@example.com")), ("full_name", json!("Jane Doe"))],
      &[("email", json!("bob@corp.test")), ("full_name", json!("Robert Brown"))],
    ])
    .build();

  let right = Dataset::builder()
    .columns(&[("user_email", "varchar"), ("name", "varchar")])
    .rows(&[
      &[("user_email", json!("john.smith@example.com")), ("name", json!("Jon Smith"))],
      &[("user_email", json!("jane_doe@example.com")), ("name", json!("Jane Do"))],
      &[("user_email", json!("rob@corp.test")), ("name", json!("Bob Brown"))],
    ])
    .build();

  (left, right)
}
