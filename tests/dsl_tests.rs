//! YAML pipelines produce the same plans and rows as the named queries.


use marquee_exec::Engine;
use marquee_planner::{parse_yaml_query, DslError, NamedQuery, QueryParams};
use test_data_gen::engine;

const FORD_FILMS: &str = r#"
steps:
  - op: scan
    table: movies
  - op: join
    table: castings
    on: [movies.id, castings.movie_id]
  - op: join
    table: actors
    on: [castings.actor_id, actors.id]
  - op: filter
    expr: "actors.name = 'Harrison Ford'"
  - op: project
    columns:
      - { column: movies.title, alias: title }
"#;

const FILMS_BY_CAST_SIZE: &str = r#"
steps:
  - op: scan
    table: castings
  - op: aggregate
    group_by: [castings.movie_id]
    aggs:
      - { func: count, column: castings.actor_id, alias: num_actors }
  - op: alias
    name: actor_count
  - op: join
    table: movies
    on: [actor_count.movie_id, movies.id]
  - op: filter
    expr: "movies.yr == 1978"
  - op: project
    columns:
      - { column: movies.title, alias: title }
      - { column: actor_count.num_actors, alias: num_actors }
  - op: sort
    by:
      - { column: num_actors, desc: true }
      - title
"#;

const COLLEAGUES: &str = r#"
steps:
  - op: scan
    table: movies
  - op: join
    table: castings
    on: [movies.id, castings.movie_id]
  - op: join
    table: actors
    on: [castings.actor_id, actors.id]
  - op: filter
    expr: "actors.name = 'Art Garfunkel'"
  - op: project
    columns: [movies.id, movies.title]
  - op: alias
    name: actor_movies
  - op: join
    table: castings
    on: [actor_movies.id, castings.movie_id]
  - op: join
    table: actors
    on: [castings.actor_id, actors.id]
  - op: filter
    expr: "actors.name <> 'Art Garfunkel'"
  - op: project
    columns: [{ column: actors.name, alias: name }]
"#;

const LEADS_OF_1962: &str = r#"
steps:
  - op: scan
    table: castings
  - op: filter
    expr: "castings.ord = 1"
  - op: join
    on: [castings.movie_id, movies.id]
    steps:
      - op: scan
        table: movies
      - op: filter
        expr: "movies.yr = 1962"
  - op: join
    table: actors
    on: [castings.actor_id, actors.id]
  - op: project
    columns: [actors.name]
  - op: sort
    by: [actors.name]
"#;

fn assert_same_as_named(yaml: &str, query: NamedQuery) {
    let engine = engine();
    let plan = parse_yaml_query(yaml).unwrap();
    assert_eq!(plan, query.default_plan().unwrap());
    assert_eq!(
        Engine::plan_hash(&plan).unwrap(),
        Engine::plan_hash(&query.default_plan().unwrap()).unwrap()
    );
    let from_yaml = engine.execute(&plan).unwrap();
    let named = engine.queries().run(query, &QueryParams::default()).unwrap();
    assert_eq!(from_yaml, named);
}

#[test]
fn test_yaml_ford_films_matches_named_query() {
    assert_same_as_named(FORD_FILMS, NamedQuery::FordFilms);
}

#[test]
fn test_yaml_cast_size_matches_named_query() {
    assert_same_as_named(FILMS_BY_CAST_SIZE, NamedQuery::FilmsByCastSize);
}

#[test]
fn test_yaml_sub_query_alias_matches_named_query() {
    assert_same_as_named(COLLEAGUES, NamedQuery::ColleaguesOfGarfunkel);
}

#[test]
fn test_yaml_nested_join_pipeline() {
    let engine = engine();
    let plan = parse_yaml_query(LEADS_OF_1962).unwrap();
    let rs = engine.execute(&plan).unwrap();
    assert_eq!(rs.column_names(), vec!["actors.name"]);
    assert_eq!(
        rs.strings("actors.name").unwrap(),
        vec![
            "Gregory Peck",
            "John Wayne",
            "John Wayne",
            "Peter O'Toole",
            "Sean Connery",
        ]
    );
}

#[test]
fn test_yaml_errors() {
    assert!(matches!(parse_yaml_query("steps: ["), Err(DslError::Yaml(_))));

    let bad_expr = concat!(
        "steps:\n",
        "  - op: scan\n    table: movies\n",
        "  - op: filter\n    expr: \"movies.yr ==\"\n",
    );
    assert!(matches!(parse_yaml_query(bad_expr), Err(DslError::Invalid(_))));

    let bad_agg = concat!(
        "steps:\n",
        "  - op: scan\n    table: castings\n",
        "  - op: aggregate\n    aggs: [{ func: median, column: castings.ord, alias: m }]\n",
    );
    assert!(parse_yaml_query(bad_agg).is_err());
}

#[test]
fn test_yaml_unknown_column_fails_at_execution() {
    let engine = engine();
    let yaml = concat!(
        "steps:\n",
        "  - op: scan\n    table: movies\n",
        "  - op: project\n    columns: [movies.year]\n",
    );
    let plan = parse_yaml_query(yaml).unwrap();
    assert!(engine.execute(&plan).is_err());
}

#[test]
fn test_bundled_pipelines_run() {
    let engine = engine();
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("queries");
    let mut ran = 0;
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
            continue;
        }
        let yaml = std::fs::read_to_string(&path).unwrap();
        let plan = parse_yaml_query(&yaml).unwrap();
        let rs = engine.execute(&plan).unwrap();
        assert!(!rs.is_empty(), "{} returned no rows", path.display());
        ran += 1;
    }
    assert!(ran >= 3);

    let yaml = std::fs::read_to_string(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("queries/ford_films.yaml"),
    )
    .unwrap();
    assert_eq!(
        parse_yaml_query(&yaml).unwrap(),
        NamedQuery::FordFilms.default_plan().unwrap()
    );
}
