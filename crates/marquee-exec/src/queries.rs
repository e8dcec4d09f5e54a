//! The nine join queries as typed operations on an [`Engine`].
//!
//! Every method builds the named plan with its default literal, evaluates
//! it against the engine's snapshot and decodes the rows. Use
//! [`Queries::run`] to override a literal or to get the raw `ResultSet`.

use serde::{Deserialize, Serialize};

use marquee_planner::{NamedQuery, QueryParams};

use crate::engine::Engine;
use crate::error::ExecError;
use crate::result::ResultSet;

/// A movie title with an actor's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleStar {
    #[serde(alias = "sixtytwo_movies")]
    pub title: String,
    #[serde(alias = "leading_star")]
    pub name: String,
}

impl TitleStar {
    pub fn new(title: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub yr: i64,
    pub num_movies: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleCount {
    pub title: String,
    pub num_actors: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct Queries<'e> {
    engine: &'e Engine,
}

impl<'e> Queries<'e> {
    pub fn new(engine: &'e Engine) -> Self {
        Self { engine }
    }

    /// Evaluate a named query, overlaying `params` on its defaults.
    pub fn run(&self, query: NamedQuery, params: &QueryParams) -> Result<ResultSet, ExecError> {
        let plan = query.plan(params)?;
        let (result, _manifest) = self.engine.run(&plan, query.name())?;
        Ok(result)
    }

    /// Every joined column (`movies.*`, `castings.*`, `actors.*`) of the
    /// films `name` appears in.
    pub fn films_with_actor(&self, name: &str) -> Result<ResultSet, ExecError> {
        self.run(NamedQuery::ExampleJoin, &QueryParams::actor(name))
    }

    /// `films_with_actor` for the default actor.
    pub fn example_join(&self) -> Result<ResultSet, ExecError> {
        self.run(NamedQuery::ExampleJoin, &QueryParams::default())
    }

    pub fn ford_films(&self) -> Result<Vec<String>, ExecError> {
        self.run(NamedQuery::FordFilms, &QueryParams::default())?
            .strings("title")
    }

    /// Ford films where he is not the lead.
    pub fn ford_supporting_films(&self) -> Result<Vec<String>, ExecError> {
        self.run(NamedQuery::FordSupportingFilms, &QueryParams::default())?
            .strings("title")
    }

    /// 1962 films with their leading star.
    pub fn films_and_stars_from_sixty_two(&self) -> Result<Vec<TitleStar>, ExecError> {
        self.run(NamedQuery::FilmsAndStarsFromSixtyTwo, &QueryParams::default())?
            .records()
    }

    /// Years in which Travolta made at least two films.
    pub fn travoltas_busiest_years(&self) -> Result<Vec<YearCount>, ExecError> {
        self.run(NamedQuery::TravoltasBusiestYears, &QueryParams::default())?
            .records()
    }

    /// Each Julie Andrews film with its lead (who may be Andrews herself).
    pub fn andrews_films_and_leads(&self) -> Result<Vec<TitleStar>, ExecError> {
        self.run(NamedQuery::AndrewsFilmsAndLeads, &QueryParams::default())?
            .records()
    }

    /// Actors with at least 15 starring roles, by name.
    pub fn prolific_actors(&self) -> Result<Vec<String>, ExecError> {
        self.run(NamedQuery::ProlificActors, &QueryParams::default())?
            .strings("name")
    }

    /// 1978 films, largest cast first, ties by title.
    pub fn films_by_cast_size(&self) -> Result<Vec<TitleCount>, ExecError> {
        self.run(NamedQuery::FilmsByCastSize, &QueryParams::default())?
            .records()
    }

    pub fn colleagues_of_garfunkel(&self) -> Result<Vec<String>, ExecError> {
        self.run(NamedQuery::ColleaguesOfGarfunkel, &QueryParams::default())?
            .strings("name")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::model::{Actor, Casting, Dataset, Movie};

    fn star_wars() -> Engine {
        Engine::new(Dataset::new(
            vec![Movie::new(1, "Star Wars", 1977)],
            vec![Actor::new(1, "Harrison Ford"), Actor::new(2, "Mark Hamill")],
            vec![Casting::new(1, 2, 1), Casting::new(1, 1, 2)],
        ))
        .unwrap()
    }

    #[test]
    fn ford_supporting_role() {
        let engine = star_wars();
        let q = engine.queries();
        assert_eq!(q.ford_films().unwrap(), vec!["Star Wars".to_string()]);
        assert_eq!(q.ford_supporting_films().unwrap(), vec!["Star Wars".to_string()]);
    }

    #[test]
    fn empty_results_are_not_errors() {
        let engine = star_wars();
        let q = engine.queries();
        assert!(q.films_and_stars_from_sixty_two().unwrap().is_empty());
        assert!(q.travoltas_busiest_years().unwrap().is_empty());
        assert!(q.prolific_actors().unwrap().is_empty());
        assert!(q.colleagues_of_garfunkel().unwrap().is_empty());
    }

    #[test]
    fn overrides_are_validated() {
        let engine = star_wars();
        let err = engine
            .queries()
            .run(NamedQuery::FordFilms, &QueryParams::year(1977))
            .unwrap_err();
        assert!(matches!(err, ExecError::Query(_)));
    }
}
