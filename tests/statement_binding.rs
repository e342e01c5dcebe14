use sql_gateway::prelude::*;

#[test]
fn board_insert_binds_all_four_fields() -> Result<(), Box<dyn std::error::Error>> {
    let fields = Fields::new()
        .with("title", "Hello")
        .with("userId", "a1")
        .with("contents", "body")
        .with("kind", 1);
    let stmt = StatementBuilder::build("board.insert", &fields)?;

    let mut placeholders = stmt.placeholders();
    placeholders.sort_unstable();
    assert_eq!(placeholders, ["contents", "kind", "title", "userId"]);

    assert_eq!(stmt.bindings().len(), 4);
    assert_eq!(stmt.binding("title"), Some(&RowValues::Text("Hello".into())));
    assert_eq!(stmt.binding("userId"), Some(&RowValues::Text("a1".into())));
    assert_eq!(stmt.binding("contents"), Some(&RowValues::Text("body".into())));
    assert_eq!(stmt.binding("kind"), Some(&RowValues::Int(1)));

    assert!(!stmt.template().contains("Hello"));
    assert_eq!(stmt.commit(), CommitDirective::Commit);
    Ok(())
}

#[test]
fn board_search_binds_a_substring_pattern() -> Result<(), Box<dyn std::error::Error>> {
    let fields = Fields::new().with("option", "title").with("keyWord", "exam");
    let stmt = StatementBuilder::build("board.search", &fields)?;

    assert_eq!(stmt.binding("keyWord"), Some(&RowValues::Text("%exam%".into())));
    assert!(!stmt.template().contains("exam"));
    assert!(stmt.template().contains("TITLE LIKE :keyWord"));
    assert!(stmt.binding("option").is_none());
    assert_eq!(stmt.commit(), CommitDirective::None);
    Ok(())
}

#[test]
fn quote_injection_stays_a_bound_value() -> Result<(), Box<dyn std::error::Error>> {
    let attack = "' OR '1'='1";
    let fields = Fields::new().with("userId", attack).with("pwd", attack);
    let stmt = StatementBuilder::build("user.login", &fields)?;

    assert!(!stmt.template().contains(attack));
    assert_eq!(stmt.binding("userId"), Some(&RowValues::Text(attack.into())));
    assert_eq!(stmt.binding("pwd"), Some(&RowValues::Text(attack.into())));

    let compiled = stmt.compile(PlaceholderStyle::Sqlite)?;
    assert!(!compiled.sql.contains(attack));
    assert_eq!(compiled.params.len(), 2);
    Ok(())
}

#[test]
fn search_keyword_wildcards_match_literally() -> Result<(), Box<dyn std::error::Error>> {
    let fields = Fields::new().with("option", "contents").with("keyWord", "100%");
    let stmt = StatementBuilder::build("board.search", &fields)?;
    assert_eq!(stmt.binding("keyWord"), Some(&RowValues::Text("%100\\%%".into())));
    Ok(())
}

#[test]
fn caller_identifiers_are_rejected() {
    for option in ["TITLE", "PWD", "title; DROP TABLE TBL_USER", "1=1 OR TITLE"] {
        let fields = Fields::new().with("option", option).with("keyWord", "x");
        let err = StatementBuilder::build("board.search", &fields).unwrap_err();
        assert!(matches!(err, SqlGatewayError::InvalidInput(_)), "{option}");
    }
}

#[test]
fn missing_and_mistyped_fields_are_invalid_input() {
    let cases = [
        ("student.insert", Fields::new().with("stuNo", "1").with("name", "Kim")),
        ("student.search", Fields::new().with("stuNo", "one")),
        ("board.view", Fields::new()),
        ("board.search", Fields::new().with("keyWord", "exam")),
        ("student.truncate", Fields::new()),
    ];
    for (op, fields) in cases {
        let err = StatementBuilder::build(op, &fields).unwrap_err();
        assert!(matches!(err, SqlGatewayError::InvalidInput(_)), "{op}");
    }
}

#[test]
fn undeclared_fields_are_ignored() -> Result<(), Box<dyn std::error::Error>> {
    let fields = Fields::new().with("stuNo", "7").with("extra", "ignored");
    let stmt = StatementBuilder::build("student.delete", &fields)?;
    assert_eq!(stmt.bindings().len(), 1);
    Ok(())
}

#[test]
fn every_operation_compiles_for_both_styles() -> Result<(), Box<dyn std::error::Error>> {
    let fields = Fields::new()
        .with("stuNo", 1)
        .with("name", "Kim")
        .with("dept", "CS")
        .with("boardNo", 3)
        .with("title", "t")
        .with("contents", "c")
        .with("userId", "u")
        .with("kind", 1)
        .with("option", "userId")
        .with("keyWord", "k")
        .with("pwd", "p");
    for op in Operation::ALL {
        let stmt = op.build(&fields)?;
        let pg = stmt.compile(PlaceholderStyle::Postgres)?;
        let lite = stmt.compile(PlaceholderStyle::Sqlite)?;
        assert_eq!(pg.params, lite.params, "{op}");
        assert!(!pg.sql.contains(':') || pg.sql.contains("::"), "{op}: {}", pg.sql);
        assert_eq!(stmt.is_write(), op.is_write());
    }
    Ok(())
}
