//! Integration tests for query parsing and matching.

use jsonfilter::jsonpath::{Parser, Query, QueryError};
use serde_json::{json, Value};

fn eval<'a>(doc: &'a Value, query: &str) -> Option<&'a Value> {
    Parser::parse(query)
        .unwrap_or_else(|err| panic!("failed to parse {}: {}", query, err))
        .evaluate(doc)
}

/// Helper to create a sample network status document
fn create_ifstatus() -> Value {
    json!({
        "interface": [
            {"interface": "loopback", "up": true, "metric": 0},
            {"interface": "wan", "up": false, "metric": 10},
            {"interface": "lan", "up": true, "metric": 5, "ipv4-address": [{"address": "192.168.1.1", "mask": 24}]}
        ],
        "statistics": {"rx_bytes": 1024, "tx_bytes": 2048},
        "release": {"description": "OpenWrt 23.05"}
    })
}

#[test]
fn test_root_returns_whole_document() {
    for doc in [json!(null), json!(3), json!("s"), json!([1, 2]), create_ifstatus()] {
        assert_eq!(eval(&doc, "$"), Some(&doc));
    }
}

#[test]
fn test_nested_keys() {
    let doc = json!({"a": {"b": 5}});
    assert_eq!(eval(&doc, "$.a.b"), Some(&json!(5)));

    let doc = json!({"a": 1});
    assert_eq!(eval(&doc, "$.a.b"), None);
}

#[test]
fn test_index_in_and_out_of_range() {
    let doc = json!([10, 20]);
    assert_eq!(eval(&doc, "$[0]"), Some(&json!(10)));
    assert_eq!(eval(&doc, "$[5]"), None);
}

#[test]
fn test_filter_selects_first_match_in_order() {
    let doc = json!([{"x": 1}, {"x": 2}, {"x": 3}]);
    assert_eq!(eval(&doc, "$[?(@.x>1)]"), Some(&json!({"x": 2})));
    assert_eq!(eval(&doc, "$[@.x >= 3]"), Some(&json!({"x": 3})));
    assert_eq!(eval(&doc, "$[@.x > 3]"), None);
}

#[test]
fn test_filter_over_object_members() {
    let doc = json!({"first": {"v": 1}, "second": {"v": 2}, "third": {"v": 2}});
    assert_eq!(eval(&doc, "$[@.v == 2]"), Some(&json!({"v": 2})));
    assert_eq!(eval(&doc, "$[@.v == 2].v"), Some(&json!(2)));
}

#[test]
fn test_filter_requires_remaining_path_to_resolve() {
    let doc = json!([{"up": true}, {"up": true, "name": "lan"}]);
    assert_eq!(eval(&doc, "$[@.up == true].name"), Some(&json!("lan")));
}

#[test]
fn test_wildcard_takes_first_element_where_rest_resolves() {
    let doc = json!([{"a": 1}, {"b": 2}, {"b": 3}]);
    assert_eq!(eval(&doc, "$[*]"), Some(&json!({"a": 1})));
    assert_eq!(eval(&doc, "$[*].b"), Some(&json!(2)));
    assert_eq!(eval(&doc, "$.*.b"), Some(&json!(2)));
    assert_eq!(eval(&doc, "$[*].c"), None);
}

#[test]
fn test_this_in_filter_refers_to_element() {
    let doc = json!({"x": 100, "items": [{"x": 1}, {"x": 100}]});
    assert_eq!(eval(&doc, "$.items[@.x == 100]"), Some(&json!({"x": 100})));
    assert_eq!(eval(&doc, "$.items[@.x == $.x]"), Some(&json!({"x": 100})));
}

#[test]
fn test_label_capture() {
    let doc = json!({"a": "hi"});
    let query = Parser::parse("name=$.a").unwrap();
    assert_eq!(query.label(), Some("name"));
    assert_eq!(query.evaluate(&doc), Some(&json!("hi")));

    let doc = json!({"a": null});
    assert_eq!(query.evaluate(&doc), Some(&Value::Null));

    let doc = json!({"b": 1});
    assert_eq!(query.evaluate(&doc), None);
}

#[test]
fn test_mismatched_kinds_never_compare() {
    let doc = json!([{"v": "1"}, {"v": 1}, {"v": true}]);
    for op in ["==", "!=", "<", "<=", ">", ">="] {
        let query = format!("$[@.v {} '1'].v", op);
        let matched = eval(&doc, &query);
        // Only the string element may take part in a string comparison.
        assert!(matched.is_none() || matched == Some(&json!("1")), "{}", query);
    }
    assert_eq!(eval(&doc, "$[@.v == 1]"), Some(&json!({"v": 1})));
    assert_eq!(eval(&doc, "$[@.v != '1' || @.v != 1]"), None);
    assert_eq!(
        eval(&doc, "$[!(@.v == '1') && !(@.v == 1)]"),
        Some(&json!({"v": true}))
    );
}

#[test]
fn test_literal_kind_mismatch_is_false_for_every_operator() {
    let doc = json!([0]);
    for op in ["==", "!=", "<", "<=", ">", ">="] {
        let query = format!("$['1' {} 1]", op);
        assert_eq!(eval(&doc, &query), None, "{}", query);
    }
}

#[test]
fn test_non_coercible_operands_are_false() {
    let doc = json!([{"v": null}, {"v": [1]}, {"v": {}}, {"v": 7}]);
    assert_eq!(eval(&doc, "$[@.v != 0]"), Some(&json!({"v": 7})));
    assert_eq!(eval(&doc, "$[!(@.v == 0)]"), Some(&json!({"v": null})));
}

#[test]
fn test_boolean_and_string_ordering() {
    let doc = json!([{"b": false, "s": "b"}, {"b": true, "s": "a"}]);
    assert_eq!(eval(&doc, "$[@.b > false].s"), Some(&json!("a")));
    assert_eq!(eval(&doc, "$[@.s < 'b'].b"), Some(&json!(true)));
    assert_eq!(eval(&doc, "$[@.s >= 'b'].b"), Some(&json!(false)));
}

#[test]
fn test_float_values_compare_by_value() {
    let doc = json!([{"v": 2.7}]);
    assert_eq!(eval(&doc, "$[@.v == 2]"), None);
    assert_eq!(eval(&doc, "$[@.v > 2].v"), Some(&json!(2.7)));
    assert_eq!(eval(&doc, "$[@.v < 3].v"), Some(&json!(2.7)));

    let doc = json!([{"v": 4.0}]);
    assert_eq!(eval(&doc, "$[@.v == 4].v"), Some(&json!(4.0)));
}

#[test]
fn test_integers_beyond_i64_compare_by_value() {
    let doc = json!([{"v": u64::MAX}]);
    assert_eq!(eval(&doc, "$[@.v == 9223372036854775807]"), None);
    assert_eq!(eval(&doc, "$[@.v > 9223372036854775807].v"), Some(&json!(u64::MAX)));

    let doc = json!({"big": u64::MAX, "list": [{"n": 1}, {"n": u64::MAX}]});
    assert_eq!(eval(&doc, "$.list[@.n == $.big].n"), Some(&json!(u64::MAX)));
}

#[test]
fn test_logical_combinators() {
    let doc = create_ifstatus();
    assert_eq!(
        eval(&doc, "$.interface[@.up == true && @.metric > 0].interface"),
        Some(&json!("lan"))
    );
    assert_eq!(
        eval(&doc, "$.interface[@.up == false || @.metric == 5].interface"),
        Some(&json!("wan"))
    );
    assert_eq!(
        eval(&doc, "$.interface[!(@.interface == 'loopback') && @.up == true].interface"),
        Some(&json!("lan"))
    );
    // A bare path tests presence, not truthiness.
    assert_eq!(
        eval(&doc, "$.interface[!(@.interface == 'loopback') && @.up].interface"),
        Some(&json!("wan"))
    );
}

#[test]
fn test_existence_filters() {
    let doc = create_ifstatus();
    assert_eq!(
        eval(&doc, "$.interface[@['ipv4-address']].interface"),
        Some(&json!("lan"))
    );
    assert_eq!(eval(&doc, "$.interface[$.missing]"), None);
    assert_eq!(
        eval(&doc, "$.interface[$.release].interface"),
        Some(&json!("loopback"))
    );
}

#[test]
fn test_nested_filters() {
    let doc = create_ifstatus();
    assert_eq!(
        eval(&doc, "$.interface[@['ipv4-address'][@.mask == 24]].interface"),
        Some(&json!("lan"))
    );
    assert_eq!(
        eval(&doc, "@[\"interface\"][2][\"ipv4-address\"][0].address"),
        Some(&json!("192.168.1.1"))
    );
}

#[test]
fn test_evaluation_is_idempotent() {
    let doc = create_ifstatus();
    let query = Parser::parse("$.interface[@.up=true].interface").unwrap();
    let first = query.evaluate(&doc);
    let second = query.evaluate(&doc);
    assert_eq!(first, second);
    assert_eq!(first, Some(&json!("loopback")));
}

#[test]
fn test_compiled_query_shared_across_threads() {
    let query: Query = "$.n".parse().unwrap();
    std::thread::scope(|scope| {
        for n in 0..4 {
            let query = &query;
            scope.spawn(move || {
                let doc = json!({"n": n});
                assert_eq!(query.evaluate(&doc), Some(&json!(n)));
            });
        }
    });
}

#[test]
fn test_parse_errors_identify_position() {
    let cases = [
        ("$.a[", 4),
        ("$.a[0", 5),
        ("$[(@.a]", 6),
        ("$[@.a ==]", 8),
        ("$.a 'x'", 4),
        ("$['unterminated", 2),
        ("$.a ~ 1", 4),
    ];
    for (expr, position) in cases {
        let err: QueryError = Parser::parse(expr).unwrap_err();
        assert_eq!(err.position(), position, "{}: {}", expr, err);
        assert!(err.report(expr).contains(expr));
    }
}

#[test]
fn test_deeply_nested_query_is_a_syntax_error() {
    let expr = format!("$[{}@]", "!".repeat(100_000));
    let err = Parser::parse(&expr).unwrap_err();
    assert!(matches!(err, QueryError::TooDeep { .. }));
    assert!(err.report(&expr).starts_with("Syntax error: Expression nested deeper than"));
}
