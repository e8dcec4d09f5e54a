//! Datasets that break referential or key integrity never reach a query.


use marquee_core::error::Error;
use marquee_core::model::{Actor, Casting, Movie};
use marquee_exec::{Engine, ExecError};
use test_data_gen::{movie_dataset, star_wars_dataset};

fn rejection(ds: marquee_core::model::Dataset) -> Error {
    match Engine::new(ds) {
        Err(ExecError::Dataset(e)) => e,
        Err(other) => panic!("expected a dataset rejection, got {other:?}"),
        Ok(_) => panic!("engine accepted an invalid dataset"),
    }
}

#[test]
fn test_fixture_is_valid() {
    assert!(movie_dataset().problems().is_empty());
    assert!(Engine::new(movie_dataset()).is_ok());
}

#[test]
fn test_dangling_movie_id() {
    let mut ds = star_wars_dataset();
    ds.castings.push(Casting::new(42, 1, 3));
    match rejection(ds) {
        Error::DataIntegrity {
            table,
            column,
            value,
            referenced,
        } => {
            assert_eq!((table, column, referenced), ("castings", "movie_id", "movies"));
            assert_eq!(value, "42");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_dangling_actor_id() {
    let mut ds = star_wars_dataset();
    ds.castings.push(Casting::new(1, 7, 3));
    let err = rejection(ds);
    assert!(err.is_data_integrity());
    assert!(err.to_string().contains("castings.actor_id = 7"));
}

#[test]
fn test_duplicate_casting_pair() {
    let mut ds = star_wars_dataset();
    ds.castings.push(Casting::new(1, 1, 3));
    assert!(matches!(
        rejection(ds),
        Error::DuplicateKey { table: "castings", .. }
    ));
}

#[test]
fn test_non_positive_ord() {
    let mut ds = star_wars_dataset();
    ds.castings[1].ord = 0;
    assert!(matches!(rejection(ds), Error::Invariant(_)));
}

#[test]
fn test_duplicate_primary_keys() {
    let mut ds = star_wars_dataset();
    ds.movies.push(Movie::new(1, "Star Wars (Special Edition)", 1997));
    assert!(matches!(
        rejection(ds),
        Error::DuplicateKey { table: "movies", .. }
    ));

    let mut ds = star_wars_dataset();
    ds.actors.push(Actor::new(2, "Luke Skywalker"));
    assert!(matches!(
        rejection(ds),
        Error::DuplicateKey { table: "actors", .. }
    ));
}

#[test]
fn test_problems_lists_every_violation() {
    let mut ds = movie_dataset();
    ds.castings.push(Casting::new(999, 999, -1));
    // missing movie, missing actor, bad ord
    assert_eq!(ds.problems().len(), 3);
}

#[test]
fn test_empty_dataset_is_valid() {
    let engine = Engine::new(Default::default()).unwrap();
    assert!(engine.queries().ford_films().unwrap().is_empty());
    assert!(engine.queries().films_by_cast_size().unwrap().is_empty());
}

#[test]
fn test_missing_director_is_not_checked() {
    let mut ds = star_wars_dataset();
    ds.movies[0].director_id = Some(12345);
    assert!(Engine::new(ds).is_ok());
}
