use dbwalker::declarative::{build_delete, build_insert, build_select, build_update};
use dbwalker::{BuilderConfig, StatementKind, WalkerError};
use serde_json::json;

#[test]
fn between_literal() {
    let stmt = build_select(&json!({
        "table": "orders",
        "columns": "id",
        "where": [{"field": "created_at", "between": ["2022-01-01", "2022-01-31"]}]
    }))
    .unwrap();
    assert_eq!(
        stmt.as_str(),
        "SELECT id FROM `orders` WHERE `created_at` BETWEEN '2022-01-01' AND '2022-01-31';"
    );
}

#[test]
fn insert_multi_row() {
    let stmt = build_insert(&json!({
        "table": "users",
        "data": [{"name": "a", "email": ""}, {"name": "b", "email": "x"}]
    }))
    .unwrap();
    assert_eq!(stmt.kind(), StatementKind::Insert);
    assert_eq!(
        stmt.as_str(),
        "INSERT INTO `users` (`name`, `email`) VALUES ('a', ''), ('b', 'x');"
    );
}

#[test]
fn insert_single_object_and_empty_data() {
    let stmt = build_insert(&json!({"table": "t", "data": {"a": 1, "b": null}})).unwrap();
    assert_eq!(stmt.as_str(), "INSERT INTO `t` (`a`, `b`) VALUES (1, NULL);");

    for data in [json!(null), json!([]), json!({})] {
        let err = build_insert(&json!({"table": "t", "data": data})).unwrap_err();
        assert!(err.is_missing_field(), "{err}");
    }
    assert!(build_insert(&json!({"table": "t"})).unwrap_err().is_missing_field());
}

#[test]
fn insert_row_missing_a_column() {
    let err = build_insert(&json!({
        "table": "users",
        "data": [{"name": "a", "email": ""}, {"name": "b"}]
    }))
    .unwrap_err();
    assert!(err.is_missing_field());
}

#[test]
fn delete_safety() {
    let err = build_delete(&json!({"table": "users"})).unwrap_err();
    assert!(err.is_missing_field());

    let err = build_delete(&json!({"table": "users", "where": []})).unwrap_err();
    assert!(err.is_missing_field());

    let stmt = build_delete(&json!({"table": "users", "where": [{"field": "id", "is": 1}]}))
        .unwrap();
    assert_eq!(stmt.as_str(), "DELETE FROM `users` WHERE `id` = 1;");
}

#[test]
fn delete_with_empty_not_in_needs_opt_out() {
    let err = build_delete(&json!({
        "table": "users",
        "where": [{"field": "id", "not_in": []}]
    }))
    .unwrap_err();
    assert!(err.is_missing_field());

    let stmt = build_delete(&json!({
        "table": "users",
        "where": [{"field": "id", "not_in": []}],
        "allow_delete_all": true
    }))
    .unwrap();
    assert_eq!(stmt.as_str(), "DELETE FROM `users` WHERE 1=1;");
}

#[test]
fn delete_all_opt_out() {
    let stmt = build_delete(&json!({"table": "users", "allow_delete_all": true})).unwrap();
    assert_eq!(stmt.as_str(), "DELETE FROM `users`;");

    let stmt = build_delete(&json!({"table": "users", "secure": false})).unwrap();
    assert_eq!(stmt.as_str(), "DELETE FROM `users`;");

    let err = build_delete(&json!({"table": "users", "secure": true})).unwrap_err();
    assert!(err.is_missing_field());
}

#[test]
fn select_full_clause() {
    let stmt = build_select(&json!({
        "table": "users AS u",
        "fields": ["u.id", {"field": "u.name", "alias": "name"}],
        "joins": [{"type": "inner", "table": "orders AS o", "on": [{"field": "o.user_id", "is": "`u`.`id`"}]}],
        "where": [{"field": "u.status", "is": "active"}],
        "group_by": ["u.id"],
        "having": "COUNT(o.id) > 2",
        "order_by": "u.id DESC",
        "limit": "10",
        "offset": 0
    }))
    .unwrap();
    assert_eq!(
        stmt.as_str(),
        "SELECT u.id, u.name AS `name` FROM `users` AS `u` \
         INNER JOIN `orders` AS `o` ON (`o`.`user_id` = `u`.`id`) \
         WHERE `u`.`status` = 'active' GROUP BY `u`.`id` HAVING COUNT(o.id) > 2 \
         ORDER BY `u`.`id` DESC LIMIT 10 OFFSET 0;"
    );
}

#[test]
fn select_drops_missing_clauses() {
    let stmt = build_select(&json!({"table": "shop.users"})).unwrap();
    assert_eq!(stmt.as_str(), "SELECT `shop`.`users`.* FROM `shop`.`users`;");

    let stmt = build_select(&json!({"table": "users", "limit": 0, "order_by": []})).unwrap();
    assert_eq!(stmt.as_str(), "SELECT `users`.* FROM `users`;");
}

#[test]
fn select_and_or_composition() {
    let stmt = build_select(&json!({
        "table": "t",
        "columns": "*",
        "where": [{"field": "id", "is": 5}, [{"field": "x", "is": 1}, {"field": "y", "is": 2}]]
    }))
    .unwrap();
    assert_eq!(
        stmt.as_str(),
        "SELECT * FROM `t` WHERE `id` = 5 AND (`x` = 1 OR `y` = 2);"
    );
}

#[test]
fn select_requires_table() {
    let err = build_select(&json!({"columns": "1"})).unwrap_err();
    assert_eq!(err, WalkerError::MissingRequiredField("table".to_string()));
}

#[test]
fn select_rejects_columns_and_fields_together() {
    let err = build_select(&json!({"table": "t", "columns": "a", "fields": "b"})).unwrap_err();
    assert!(matches!(err, WalkerError::AmbiguousOperatorKey(_)));
}

#[test]
fn injection_attempts_stay_quoted() {
    let stmt = build_select(&json!({
        "table": "users",
        "columns": "id",
        "where": [{"field": "name", "is": "x' OR '1'='1"}, {"field": "bio", "like": "100%' --"}]
    }))
    .unwrap();
    assert_eq!(
        stmt.as_str(),
        "SELECT id FROM `users` WHERE `name` = 'x\\' OR \\'1\\'=\\'1' \
         AND `bio` LIKE '%100\\%\\' --%';"
    );
}

#[test]
fn backticked_values_must_be_identifiers() {
    let stmt = build_select(&json!({
        "table": "users",
        "where": [{"field": "name", "is": "`a` OR 1=1 OR `b`"}, {"field": "o.id", "is": "`u`.`id`"}]
    }))
    .unwrap();
    assert_eq!(
        stmt.as_str(),
        "SELECT `users`.* FROM `users` WHERE `name` = '`a` OR 1=1 OR `b`' AND `o`.`id` = `u`.`id`;"
    );
}

#[test]
fn data_keys_are_quoted_identifiers() {
    let stmt = build_insert(&json!({
        "table": "users",
        "data": {"user-name": "a", "x) VALUES (1); DROP TABLE users; --": 1}
    }))
    .unwrap();
    assert_eq!(
        stmt.as_str(),
        "INSERT INTO `users` (`user-name`, `x) VALUES (1); DROP TABLE users; --`) VALUES ('a', 1);"
    );

    let stmt = build_update(&json!({
        "table": "users",
        "data": {"first name": "a"},
        "where": [{"field": "id", "is": 1}]
    }))
    .unwrap();
    assert_eq!(stmt.as_str(), "UPDATE `users` SET `first name` = 'a' WHERE `id` = 1;");
}

#[test]
fn update_with_functions_and_having() {
    let stmt = build_update(&json!({
        "table": "users",
        "data": {"password": {"md5": "secret"}, "updated_at": "now()", "name": "o'neil"},
        "where": {"field": "id", "is": 3},
        "having": "1 = 1"
    }))
    .unwrap();
    assert_eq!(stmt.kind(), StatementKind::Update);
    assert_eq!(
        stmt.as_str(),
        "UPDATE `users` SET `password` = MD5('secret'), `updated_at` = NOW(), \
         `name` = 'o\\'neil' WHERE `id` = 3 HAVING 1 = 1;"
    );
}

#[test]
fn update_requires_data() {
    let err = build_update(&json!({"table": "users", "where": "id = 1"})).unwrap_err();
    assert!(err.is_missing_field());
    let err = build_update(&json!({"table": "users", "data": {}})).unwrap_err();
    assert!(err.is_missing_field());
}

#[test]
fn custom_whitelist_applies_to_declarative_builds() {
    let config = BuilderConfig::new().deny_function("NOW");
    let stmt = dbwalker::declarative::build_insert_with(
        &json!({"table": "t", "data": {"a": "NOW()"}}),
        &config,
    )
    .unwrap();
    assert_eq!(stmt.as_str(), "INSERT INTO `t` (`a`) VALUES ('NOW()');");
}
