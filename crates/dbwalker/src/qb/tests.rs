//! Integration tests for the qb module.

use crate::columns::Column;
use crate::condition::{Condition, Predicate};
use crate::config::BuilderConfig;
use crate::error::WalkerError;
use crate::join::Join;
use crate::qb::{SqlQb, delete, insert, select, update};
use crate::row::Row;
use crate::statement::StatementKind;
use crate::value::Value;

#[test]
fn test_select_basic() {
    let stmt = select("users").build().unwrap();
    assert_eq!(stmt.kind(), StatementKind::Select);
    assert_eq!(stmt.as_str(), "SELECT `users`.* FROM `users`;");
}

#[test]
fn test_select_default_projection_uses_alias() {
    let sql = select("shop.users AS u").to_sql().unwrap();
    assert_eq!(sql, "SELECT `u`.* FROM `shop`.`users` AS `u`;");
}

#[test]
fn test_select_full_clause_order() {
    let sql = select("users AS u")
        .columns([Column::raw("u.id"), Column::count_distinct("o.id", "orders")])
        .join(Join::left("orders AS o").on([Predicate::is("o.user_id", Value::column("u.id").unwrap())]))
        .is("u.status", "active")
        .group_by("u.id")
        .having(Predicate::raw("COUNT(o.id) > 1"))
        .order_by("u.id DESC")
        .limit(10)
        .offset(20)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT u.id, COUNT(DISTINCT `o`.`id`) AS `orders` FROM `users` AS `u` \
         LEFT JOIN `orders` AS `o` ON (`o`.`user_id` = `u`.`id`) \
         WHERE `u`.`status` = 'active' GROUP BY `u`.`id` HAVING COUNT(o.id) > 1 \
         ORDER BY `u`.`id` DESC LIMIT 10 OFFSET 20;"
    );
}

#[test]
fn test_select_drops_each_missing_clause() {
    let base = || {
        select("users")
            .columns(["id"])
            .is("id", 1)
            .group_by("id")
            .order_by("id")
            .limit(5)
    };
    assert_eq!(
        base().to_sql().unwrap(),
        "SELECT id FROM `users` WHERE `id` = 1 GROUP BY `id` ORDER BY `id` LIMIT 5;"
    );
    assert_eq!(
        select("users").columns(["id"]).is("id", 1).to_sql().unwrap(),
        "SELECT id FROM `users` WHERE `id` = 1;"
    );
    assert_eq!(
        select("users").columns(["id"]).order_by("id").to_sql().unwrap(),
        "SELECT id FROM `users` ORDER BY `id`;"
    );
}

#[test]
fn test_select_limit_zero_and_offset_zero() {
    let sql = select("t").limit(0).offset(0).to_sql().unwrap();
    assert_eq!(sql, "SELECT `t`.* FROM `t` OFFSET 0;");
}

#[test]
fn test_select_and_or_composition() {
    let sql = select("t")
        .columns(["*"])
        .is("id", 5)
        .any_of([Predicate::is("x", 1), Predicate::is("y", 2)])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM `t` WHERE `id` = 5 AND (`x` = 1 OR `y` = 2);"
    );
}

#[test]
fn test_select_between_literal() {
    let sql = select("orders")
        .columns(["id"])
        .between("created_at", "2022-01-01", "2022-01-31")
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT id FROM `orders` WHERE `created_at` BETWEEN '2022-01-01' AND '2022-01-31';"
    );
}

#[test]
fn test_select_missing_table() {
    let err = select("  ").build().unwrap_err();
    assert_eq!(err, WalkerError::MissingRequiredField("table".to_string()));
}

#[test]
fn test_select_bad_join_fails_whole_build() {
    let err = select("users").join(Join::left("orders")).build().unwrap_err();
    assert!(err.is_missing_field());
}

#[test]
fn test_insert_single_row() {
    let stmt = insert("users")
        .set("username", "alice")
        .set("email", "alice@example.com")
        .build()
        .unwrap();
    assert_eq!(stmt.kind(), StatementKind::Insert);
    assert_eq!(
        stmt.as_str(),
        "INSERT INTO `users` (`username`, `email`) VALUES ('alice', 'alice@example.com');"
    );
}

#[test]
fn test_insert_multi_row() {
    let sql = insert("users")
        .row(Row::new().set("name", "a").set("email", ""))
        .row(Row::new().set("email", "x").set("name", "b"))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO `users` (`name`, `email`) VALUES ('a', ''), ('b', 'x');"
    );
}

#[test]
fn test_insert_uses_name_without_alias() {
    let sql = insert("shop.users AS u").set("id", 1).to_sql().unwrap();
    assert_eq!(sql, "INSERT INTO `shop`.`users` (`id`) VALUES (1);");
}

#[test]
fn test_insert_row_shape_errors() {
    let missing = insert("users")
        .row(Row::new().set("name", "a").set("email", ""))
        .row(Row::new().set("name", "b"))
        .build()
        .unwrap_err();
    assert!(missing.is_missing_field());

    let extra = insert("users")
        .row(Row::new().set("name", "a"))
        .row(Row::new().set("name", "b").set("age", 3))
        .build()
        .unwrap_err();
    assert!(matches!(extra, WalkerError::RowShapeMismatch { row: 1, .. }));
}

#[test]
fn test_insert_columns_are_always_quoted() {
    let sql = insert("users")
        .set("user-name", "a")
        .set("first name", "b")
        .set("x) VALUES (1); DROP TABLE users; --", 1)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO `users` (`user-name`, `first name`, `x) VALUES (1); DROP TABLE users; --`) \
         VALUES ('a', 'b', 1);"
    );
}

#[test]
fn test_insert_column_backticks_cannot_close_the_quote() {
    let sql = insert("t").set("a`) VALUES (1); --", 2).to_sql().unwrap();
    assert_eq!(sql, "INSERT INTO `t` (`a) VALUES (1); --`) VALUES (2);");
}

#[test]
fn test_insert_without_data() {
    assert!(insert("users").build().unwrap_err().is_missing_field());
    assert!(insert("users").row(Row::new()).build().unwrap_err().is_missing_field());
}

#[test]
fn test_insert_function_values() {
    let sql = insert("users")
        .set("id", "uuid()")
        .set("password", Value::call("md5", "secret"))
        .set("created_at", "NOW()")
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO `users` (`id`, `password`, `created_at`) VALUES (UUID(), MD5('secret'), NOW());"
    );
}

#[test]
fn test_update_basic() {
    let stmt = update("users")
        .set("status", "inactive")
        .set("note", Value::Null)
        .is("id", 7)
        .build()
        .unwrap();
    assert_eq!(stmt.kind(), StatementKind::Update);
    assert_eq!(
        stmt.as_str(),
        "UPDATE `users` SET `status` = 'inactive', `note` = NULL WHERE `id` = 7;"
    );
}

#[test]
fn test_update_with_join_and_having() {
    let sql = update("users AS u")
        .join(Join::inner("orders AS o").on([Predicate::raw("o.user_id = u.id")]))
        .set("u.vip", true)
        .filter(Condition::raw("o.total > 100"))
        .having(Predicate::raw("COUNT(*) > 1"))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE `users` AS `u` INNER JOIN `orders` AS `o` ON (o.user_id = u.id) \
         SET `u`.`vip` = 1 WHERE o.total > 100 HAVING COUNT(*) > 1;"
    );
}

#[test]
fn test_update_set_targets_are_always_quoted() {
    let sql = update("users")
        .set("first name", "a")
        .set("user-name", "b")
        .is("id", 1)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE `users` SET `first name` = 'a', `user-name` = 'b' WHERE `id` = 1;"
    );
    assert!(update("users").set("a.b.c.d", 1).is("id", 1).build().is_err());
}

#[test]
fn test_update_requires_data() {
    assert!(update("users").is("id", 1).build().unwrap_err().is_missing_field());
}

#[test]
fn test_delete_basic() {
    let stmt = delete("users").is("id", 1).build().unwrap();
    assert_eq!(stmt.kind(), StatementKind::Delete);
    assert_eq!(stmt.as_str(), "DELETE FROM `users` WHERE `id` = 1;");
}

#[test]
fn test_delete_without_where_is_rejected() {
    let err = delete("users").build().unwrap_err();
    assert!(err.is_missing_field());
}

#[test]
fn test_delete_with_always_true_where_is_rejected() {
    let err = delete("users")
        .not_in("id", Vec::<i32>::new())
        .build()
        .unwrap_err();
    assert!(err.is_missing_field());

    let err = delete("users")
        .any_of([Predicate::is("id", 1), Predicate::not_in("id", Vec::<i32>::new())])
        .build()
        .unwrap_err();
    assert!(err.is_missing_field());

    let sql = delete("users")
        .not_in("id", Vec::<i32>::new())
        .is("org_id", 3)
        .to_sql()
        .unwrap();
    assert_eq!(sql, "DELETE FROM `users` WHERE 1=1 AND `org_id` = 3;");

    let sql = delete("users")
        .not_in("id", Vec::<i32>::new())
        .allow_delete_all(true)
        .to_sql()
        .unwrap();
    assert_eq!(sql, "DELETE FROM `users` WHERE 1=1;");
}

#[test]
fn test_delete_all_opt_in() {
    let sql = delete("users").allow_delete_all(true).to_sql().unwrap();
    assert_eq!(sql, "DELETE FROM `users`;");
}

#[test]
fn test_build_is_repeatable() {
    let qb = select("users").is("id", 1);
    assert_eq!(qb.build().unwrap(), qb.build().unwrap());
}

#[test]
fn test_custom_config_whitelist() {
    let config = BuilderConfig::with_functions(["NOW"]);
    let qb = insert("t").set("a", "UUID()").set("b", "now()");
    let sql = qb.build_with(&config).unwrap();
    assert_eq!(
        sql.as_str(),
        "INSERT INTO `t` (`a`, `b`) VALUES ('UUID()', NOW());"
    );

    let err = insert("t")
        .set("a", Value::call("md5", "x"))
        .build_with(&config)
        .unwrap_err();
    assert!(matches!(err, WalkerError::InvalidValue(_)));
}
