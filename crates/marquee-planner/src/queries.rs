//! The nine named join queries over movies, actors and castings.
//!
//! Each query has a fixed default literal (an actor name, a year, a count
//! threshold). The literal can be overridden through [`QueryParams`]; it is
//! always bound into the plan as a typed literal, never spliced into text.

use std::fmt;
use std::str::FromStr;

use marquee_core::dag::{AggregateExpr, LogicalPlan, SortKey};
use marquee_core::error::{Error, Result};
use marquee_core::expr::{col, lit};
use marquee_core::model::{ACTORS, CASTINGS, MOVIES};

use crate::builder::PlanBuilder;

const YEARS: std::ops::RangeInclusive<i64> = 1800..=3000;

/// Overrides for a query's baked-in literal. `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub actor: Option<String>,
    pub year: Option<i64>,
    pub min_count: Option<i64>,
}

impl QueryParams {
    pub fn actor(name: impl Into<String>) -> Self {
        Self {
            actor: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn year(year: i64) -> Self {
        Self {
            year: Some(year),
            ..Self::default()
        }
    }

    pub fn min_count(n: i64) -> Self {
        Self {
            min_count: Some(n),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedQuery {
    ExampleJoin,
    FordFilms,
    FordSupportingFilms,
    FilmsAndStarsFromSixtyTwo,
    TravoltasBusiestYears,
    AndrewsFilmsAndLeads,
    ProlificActors,
    FilmsByCastSize,
    ColleaguesOfGarfunkel,
}

impl NamedQuery {
    pub const ALL: [NamedQuery; 9] = [
        NamedQuery::ExampleJoin,
        NamedQuery::FordFilms,
        NamedQuery::FordSupportingFilms,
        NamedQuery::FilmsAndStarsFromSixtyTwo,
        NamedQuery::TravoltasBusiestYears,
        NamedQuery::AndrewsFilmsAndLeads,
        NamedQuery::ProlificActors,
        NamedQuery::FilmsByCastSize,
        NamedQuery::ColleaguesOfGarfunkel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NamedQuery::ExampleJoin => "example_join",
            NamedQuery::FordFilms => "ford_films",
            NamedQuery::FordSupportingFilms => "ford_supporting_films",
            NamedQuery::FilmsAndStarsFromSixtyTwo => "films_and_stars_from_sixty_two",
            NamedQuery::TravoltasBusiestYears => "travoltas_busiest_years",
            NamedQuery::AndrewsFilmsAndLeads => "andrews_films_and_leads",
            NamedQuery::ProlificActors => "prolific_actors",
            NamedQuery::FilmsByCastSize => "films_by_cast_size",
            NamedQuery::ColleaguesOfGarfunkel => "colleagues_of_garfunkel",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            NamedQuery::ExampleJoin => "Every movie/casting/actor row for one actor",
            NamedQuery::FordFilms => "Films in which the actor has appeared",
            NamedQuery::FordSupportingFilms => {
                "Films where the actor appeared, but not in the starring role"
            }
            NamedQuery::FilmsAndStarsFromSixtyTwo => {
                "Title and leading star of every film of the year"
            }
            NamedQuery::TravoltasBusiestYears => "Years in which the actor made at least N films",
            NamedQuery::AndrewsFilmsAndLeads => {
                "Title and leading actor of every film the actor played in"
            }
            NamedQuery::ProlificActors => "Actors with at least N starring roles, alphabetically",
            NamedQuery::FilmsByCastSize => "Films of the year by cast size (desc), then title",
            NamedQuery::ColleaguesOfGarfunkel => "Everyone who has played alongside the actor",
        }
    }

    /// Literals used when no override is given.
    pub fn default_params(&self) -> QueryParams {
        match self {
            NamedQuery::ExampleJoin => QueryParams::actor("Sean Connery"),
            NamedQuery::FordFilms | NamedQuery::FordSupportingFilms => {
                QueryParams::actor("Harrison Ford")
            }
            NamedQuery::FilmsAndStarsFromSixtyTwo => QueryParams::year(1962),
            NamedQuery::TravoltasBusiestYears => QueryParams {
                actor: Some("John Travolta".into()),
                min_count: Some(2),
                ..QueryParams::default()
            },
            NamedQuery::AndrewsFilmsAndLeads => QueryParams::actor("Julie Andrews"),
            NamedQuery::ProlificActors => QueryParams::min_count(15),
            NamedQuery::FilmsByCastSize => QueryParams::year(1978),
            NamedQuery::ColleaguesOfGarfunkel => QueryParams::actor("Art Garfunkel"),
        }
    }

    /// Defaults overlaid with `overrides`; rejects parameters the query
    /// does not take and out-of-domain values.
    pub fn resolve(&self, overrides: &QueryParams) -> Result<QueryParams> {
        let defaults = self.default_params();
        let reject = |param: &str| {
            Err(Error::InvalidQuery(format!(
                "{} does not take a '{}' parameter",
                self.name(),
                param
            )))
        };
        if overrides.actor.is_some() && defaults.actor.is_none() {
            return reject("actor");
        }
        if overrides.year.is_some() && defaults.year.is_none() {
            return reject("year");
        }
        if overrides.min_count.is_some() && defaults.min_count.is_none() {
            return reject("min_count");
        }

        let params = QueryParams {
            actor: overrides.actor.clone().or(defaults.actor),
            year: overrides.year.or(defaults.year),
            min_count: overrides.min_count.or(defaults.min_count),
        };
        if let Some(actor) = &params.actor {
            if actor.trim().is_empty() {
                return Err(Error::InvalidQuery("actor name must not be empty".into()));
            }
        }
        if let Some(year) = params.year {
            if !YEARS.contains(&year) {
                return Err(Error::InvalidQuery(format!(
                    "year {} outside {}..={}",
                    year,
                    YEARS.start(),
                    YEARS.end()
                )));
            }
        }
        if let Some(n) = params.min_count {
            if n < 1 {
                return Err(Error::InvalidQuery(format!("min_count must be positive, got {}", n)));
            }
        }
        Ok(params)
    }

    /// Plan with the default literals.
    pub fn default_plan(&self) -> Result<LogicalPlan> {
        self.plan(&QueryParams::default())
    }

    pub fn plan(&self, overrides: &QueryParams) -> Result<LogicalPlan> {
        let p = self.resolve(overrides)?;
        let actor = p.actor.unwrap_or_default();
        let year = p.year.unwrap_or_default();
        let min_count = p.min_count.unwrap_or_default();

        let plan = match self {
            NamedQuery::ExampleJoin => PlanBuilder::cast_join()?
                .filter(col("actors.name").eq(lit(actor)))
                .build(),

            NamedQuery::FordFilms => PlanBuilder::cast_join()?
                .filter(col("actors.name").eq(lit(actor)))
                .project([("movies.title", "title")])
                .build(),

            NamedQuery::FordSupportingFilms => PlanBuilder::cast_join()?
                .filter(
                    col("actors.name")
                        .eq(lit(actor))
                        .and(col("castings.ord").not_eq(lit(1))),
                )
                .project([("movies.title", "title")])
                .build(),

            NamedQuery::FilmsAndStarsFromSixtyTwo => PlanBuilder::cast_join()?
                .filter(
                    col("movies.yr")
                        .eq(lit(year))
                        .and(col("castings.ord").eq(lit(1))),
                )
                .project([
                    ("movies.title", "sixtytwo_movies"),
                    ("actors.name", "leading_star"),
                ])
                .build(),

            NamedQuery::TravoltasBusiestYears => PlanBuilder::cast_join()?
                .filter(col("actors.name").eq(lit(actor)))
                .aggregate(
                    &["movies.yr"],
                    vec![AggregateExpr::count("movies.id", "num_movies")],
                )
                .filter(col("num_movies").gt_eq(lit(min_count)))
                .project([("movies.yr", "yr"), ("num_movies", "num_movies")])
                .build(),

            NamedQuery::AndrewsFilmsAndLeads => actor_movies(&actor)?
                .join(PlanBuilder::scan(CASTINGS)?, "actor_movies.id", "castings.movie_id")
                .join(PlanBuilder::scan(ACTORS)?, "castings.actor_id", "actors.id")
                .filter(col("castings.ord").eq(lit(1)))
                .project([("actor_movies.title", "title"), ("actors.name", "name")])
                .build(),

            NamedQuery::ProlificActors => PlanBuilder::scan(CASTINGS)?
                .filter(col("castings.ord").eq(lit(1)))
                .aggregate(
                    &["castings.actor_id"],
                    vec![AggregateExpr::count("castings.actor_id", "num_lead_roles")],
                )
                .alias("leading_role_count")
                .join(PlanBuilder::scan(ACTORS)?, "leading_role_count.actor_id", "actors.id")
                .filter(col("leading_role_count.num_lead_roles").gt_eq(lit(min_count)))
                .project([("actors.name", "name")])
                .sort(vec![SortKey::asc("name")])
                .build(),

            NamedQuery::FilmsByCastSize => PlanBuilder::scan(CASTINGS)?
                .aggregate(
                    &["castings.movie_id"],
                    vec![AggregateExpr::count("castings.actor_id", "num_actors")],
                )
                .alias("actor_count")
                .join(PlanBuilder::scan(MOVIES)?, "actor_count.movie_id", "movies.id")
                .filter(col("movies.yr").eq(lit(year)))
                .project([
                    ("movies.title", "title"),
                    ("actor_count.num_actors", "num_actors"),
                ])
                .sort(vec![SortKey::desc("num_actors"), SortKey::asc("title")])
                .build(),

            NamedQuery::ColleaguesOfGarfunkel => actor_movies(&actor)?
                .join(PlanBuilder::scan(CASTINGS)?, "actor_movies.id", "castings.movie_id")
                .join(PlanBuilder::scan(ACTORS)?, "castings.actor_id", "actors.id")
                .filter(col("actors.name").not_eq(lit(actor.as_str())))
                .project([("actors.name", "name")])
                .build(),
        };
        Ok(plan)
    }
}

/// `(SELECT movies.id, movies.title FROM <cast join> WHERE actors.name = ?) AS actor_movies`
fn actor_movies(actor: &str) -> Result<PlanBuilder> {
    Ok(PlanBuilder::cast_join()?
        .filter(col("actors.name").eq(lit(actor)))
        .project(["movies.id", "movies.title"])
        .alias("actor_movies"))
}

impl fmt::Display for NamedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NamedQuery {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().replace('-', "_").to_ascii_lowercase();
        NamedQuery::ALL
            .into_iter()
            .find(|q| q.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = NamedQuery::ALL.iter().map(|q| q.name()).collect();
                Error::InvalidQuery(format!(
                    "unknown query '{}' (known: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for q in NamedQuery::ALL {
            assert_eq!(q.name().parse::<NamedQuery>().unwrap(), q);
        }
        assert_eq!(
            "ford-films".parse::<NamedQuery>().unwrap(),
            NamedQuery::FordFilms
        );
    }

    #[test]
    fn every_query_plans_with_defaults() {
        for q in NamedQuery::ALL {
            assert!(q.default_plan().is_ok(), "{} failed to plan", q);
        }
    }

    #[test]
    fn rejects_foreign_and_out_of_domain_params() {
        let err = NamedQuery::ProlificActors
            .plan(&QueryParams::actor("Harrison Ford"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));

        let err = NamedQuery::FilmsByCastSize
            .plan(&QueryParams::year(42))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));

        let err = NamedQuery::FordFilms.plan(&QueryParams::actor("  ")).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
    }

    #[test]
    fn override_replaces_default_literal() {
        let plan = NamedQuery::FordFilms
            .plan(&QueryParams::actor("Mark Hamill"))
            .unwrap();
        assert!(plan.to_string().contains("'Mark Hamill'"));
        assert!(!plan.to_string().contains("Harrison Ford"));
    }
}
