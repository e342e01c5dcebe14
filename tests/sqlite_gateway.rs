#![cfg(feature = "sqlite")]
use std::time::Duration;

use serde_json::json;
use sql_gateway::prelude::*;
use sql_gateway::schema::init_schema;
use tokio::runtime::Runtime;

async fn gateway(path: std::path::PathBuf) -> Result<Gateway, SqlGatewayError> {
    let cap = ConfigAndPool::new_sqlite(SqliteOptions::new(path), PoolOptions::default()).await?;
    init_schema(&cap).await?;
    Ok(Gateway::new(
        cap,
        ExecutorOptions {
            statement_timeout: Duration::from_secs(5),
            read_retries: 1,
            retry_backoff: Duration::from_millis(10),
        },
    ))
}

#[test]
fn student_roster_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    let dir = tempfile::tempdir()?;

    rt.block_on(async {
        let gw = gateway(dir.path().join("roster.db")).await?;

        for (no, name, dept) in [(1, "Kim", "CS"), (2, "Lee", "EE")] {
            let stmt = StatementBuilder::build(
                "student.insert",
                &Fields::new().with("stuNo", no).with("name", name).with("dept", dept),
            )?;
            assert_eq!(gw.apply(&stmt).await?, 1);
        }

        let list = StatementBuilder::build("student.list", &Fields::new())?;
        let records = gw.fetch(&list).await?.project()?;
        assert_eq!(
            serde_json::to_value(&records)?,
            json!([
                {"STU_NO": 1, "STU_NAME": "Kim", "STU_DEPT": "CS"},
                {"STU_NO": 2, "STU_NAME": "Lee", "STU_DEPT": "EE"}
            ])
        );

        let update = StatementBuilder::build(
            "student.update",
            &Fields::new().with("stuNo", "2").with("name", "Park").with("dept", "ME"),
        )?;
        assert_eq!(gw.apply(&update).await?, 1);

        let search = StatementBuilder::build("student.search", &Fields::new().with("stuNo", "2"))?;
        let records = gw.fetch(&search).await?.project()?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("STU_NAME"), Some(&RowValues::Text("Park".into())));

        let delete = StatementBuilder::build("student.delete", &Fields::new().with("stuNo", 1))?;
        assert_eq!(gw.apply(&delete).await?, 1);
        assert_eq!(gw.fetch(&list).await?.len(), 1);

        // duplicate primary key fails before commit: a plain database error
        let dup = StatementBuilder::build(
            "student.insert",
            &Fields::new().with("stuNo", 2).with("name", "Dup").with("dept", "X"),
        )?;
        let err = gw.apply(&dup).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Database);

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}

#[test]
fn board_search_and_hit_counter() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    let dir = tempfile::tempdir()?;

    rt.block_on(async {
        let gw = gateway(dir.path().join("board.db")).await?;

        for (title, contents) in [("exam schedule", "room 101"), ("lunch", "100% off_today")] {
            let stmt = StatementBuilder::build(
                "board.insert",
                &Fields::new()
                    .with("title", title)
                    .with("userId", "a1")
                    .with("contents", contents)
                    .with("kind", 1),
            )?;
            gw.apply(&stmt).await?;
        }

        let search = StatementBuilder::build(
            "board.search",
            &Fields::new().with("option", "title").with("keyWord", "exam"),
        )?;
        let found = gw.fetch(&search).await?.project()?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get("TITLE"), Some(&RowValues::Text("exam schedule".into())));

        // `%` in the keyword is literal, so only the post containing "100%" matches
        let literal = StatementBuilder::build(
            "board.search",
            &Fields::new().with("option", "contents").with("keyWord", "0%"),
        )?;
        let found = gw.fetch(&literal).await?.project()?;
        assert_eq!(found.len(), 1);

        let underscore = StatementBuilder::build(
            "board.search",
            &Fields::new().with("option", "contents").with("keyWord", "m_1"),
        )?;
        assert!(gw.fetch(&underscore).await?.is_empty());

        let board_no = found[0].get("BOARDNO").and_then(RowValues::as_int).copied();
        let board_no = board_no.ok_or("missing BOARDNO")?;
        let hit = StatementBuilder::build("board.hit", &Fields::new().with("boardNo", board_no))?;
        gw.apply(&hit).await?;
        gw.apply(&hit).await?;

        let view = StatementBuilder::build("board.view", &Fields::new().with("boardNo", board_no))?;
        let post = gw.fetch(&view).await?.project()?;
        assert_eq!(post[0].get("CNT"), Some(&RowValues::Int(2)));
        assert!(post[0].get("CDATETIME").and_then(RowValues::as_timestamp).is_some());
        assert_eq!(
            post[0].keys().collect::<Vec<_>>(),
            ["BOARDNO", "TITLE", "CONTENTS", "USERID", "KIND", "CNT", "CDATETIME", "UDATETIME"]
        );

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}

#[test]
fn login_with_injection_finds_nobody() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    let dir = tempfile::tempdir()?;

    rt.block_on(async {
        let gw = gateway(dir.path().join("users.db")).await?;
        let join = StatementBuilder::build(
            "user.join",
            &Fields::new().with("userId", "admin").with("pwd", "secret"),
        )?;
        gw.apply(&join).await?;

        let attack = "' OR '1'='1";
        let login = StatementBuilder::build(
            "user.login",
            &Fields::new().with("userId", attack).with("pwd", attack),
        )?;
        assert!(gw.fetch(&login).await?.is_empty());

        let login = StatementBuilder::build(
            "user.login",
            &Fields::new().with("userId", "admin").with("pwd", "secret"),
        )?;
        let users = gw.fetch(&login).await?.project()?;
        assert_eq!(serde_json::to_value(&users)?, json!([{"USERID": "admin"}]));

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}
