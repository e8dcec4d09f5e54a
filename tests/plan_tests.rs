//! Plan rendering, fingerprints and the typed builder.


use marquee_core::dag::LogicalPlan;
use marquee_core::expr::{col, lit, Expr};
use marquee_core::types::{Column, RowBatch, Scalar};
use marquee_exec::Engine;
use marquee_planner::{NamedQuery, PlanBuilder, QueryParams};
use test_data_gen::engine;

#[test]
fn test_fingerprints_are_stable_and_distinct() {
    let mut seen = std::collections::HashSet::new();
    for query in NamedQuery::ALL {
        let a = Engine::plan_hash(&query.default_plan().unwrap()).unwrap();
        let b = Engine::plan_hash(&query.default_plan().unwrap()).unwrap();
        assert_eq!(a, b);
        assert!(seen.insert(a), "{} shares a fingerprint", query);
    }
}

#[test]
fn test_parameters_change_the_fingerprint() {
    let default = NamedQuery::FordFilms.default_plan().unwrap();
    let other = NamedQuery::FordFilms
        .plan(&QueryParams::actor("Carrie Fisher"))
        .unwrap();
    assert_ne!(
        Engine::plan_hash(&default).unwrap(),
        Engine::plan_hash(&other).unwrap()
    );
}

#[test]
fn test_explain_tree() {
    let plan = NamedQuery::ProlificActors.default_plan().unwrap();
    let text = plan.to_string();
    let first = text.lines().next().unwrap();
    assert!(first.starts_with("Sort"), "{text}");
    assert!(text.contains("Alias"));
    assert!(text.contains("Aggregate"));
    assert_eq!(plan.tables(), vec!["castings", "actors"]);
}

#[test]
fn test_output_schema_of_every_named_query() {
    let engine = engine();
    for query in NamedQuery::ALL {
        let plan = query.default_plan().unwrap();
        let schema = engine.output_schema(&plan).unwrap();
        let rs = engine.execute(&plan).unwrap();
        assert_eq!(&schema, rs.schema(), "{}", query);
    }
}

#[test]
fn test_sub_query_plan_joins_materialised_child() {
    let plan = NamedQuery::ColleaguesOfGarfunkel.default_plan().unwrap();
    let mut aliases = Vec::new();
    let mut stack = vec![&plan];
    while let Some(node) = stack.pop() {
        if let LogicalPlan::Alias { name, .. } = node {
            aliases.push(name.clone());
        }
        stack.extend(node.children());
    }
    assert_eq!(aliases, vec!["actor_movies".to_string()]);
}

#[test]
fn test_builder_matches_hand_written_plan() {
    let engine = engine();
    let plan = PlanBuilder::cast_join()
        .unwrap()
        .filter(col("movies.yr").eq(lit(1978)).and(col("castings.ord").eq(lit(1))))
        .project([("movies.title", "title"), ("actors.name", "name")])
        .build();
    let rs = engine.execute(&plan).unwrap();
    let titles = rs.strings("title").unwrap();
    assert_eq!(titles.len(), 4);
    assert!(titles.contains(&"Grease".to_string()));
}

#[test]
fn test_expression_null_semantics() {
    let batch = RowBatch::new(vec![
        Column::new("movies.director_id", vec![Scalar::Null, Scalar::I64(105)]),
        Column::new("movies.title", vec!["Dr. No".into(), "Raiders".into()]),
    ]);
    let eq = Expr::parse("movies.director_id = 105").unwrap();
    assert_eq!(eq.evaluate(&batch, 0).unwrap(), Scalar::Null);
    assert!(!eq.evaluate_bool(&batch, 0).unwrap());
    assert!(eq.evaluate_bool(&batch, 1).unwrap());

    let ne = Expr::parse("movies.director_id <> 105").unwrap();
    assert!(!ne.evaluate_bool(&batch, 0).unwrap());

    let is_null = Expr::parse("movies.director_id IS NULL").unwrap();
    assert!(is_null.evaluate_bool(&batch, 0).unwrap());
    assert!(!is_null.evaluate_bool(&batch, 1).unwrap());

    let quoted = Expr::parse("movies.title = 'Dr. No' OR movies.director_id >= 100").unwrap();
    assert!(quoted.evaluate_bool(&batch, 0).unwrap());
    assert!(quoted.evaluate_bool(&batch, 1).unwrap());
}
