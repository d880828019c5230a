//! Query construction for listing search.
//!
//! Every user-supplied term is bound as a parameter. Substring terms also
//! have their LIKE wildcards escaped so `%` and `_` match literally.
//!
//! Case folding happens in Rust on both sides: listings keep lower-cased
//! copies of their searchable text (`name_search`, `genre_search`) and
//! terms are lower-cased the same way, so accented and full-width letters
//! fold on every backend.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sea_orm::sea_query::{BinOper, Expr, LikeExpr, Order, Query, SimpleExpr};
use sea_orm::{Condition, EntityTrait, QueryFilter, QueryOrder, Select};

use super::entities::{listing, listing_tag};
use crate::domain::{ListingFields, SearchFilter};

/// Escape character for LIKE patterns; chosen so it needs no quoting in
/// any backend's string literals.
const LIKE_ESCAPE: char = '!';

/// Joins the folded fields of a search column. Terms never contain it, so
/// a match cannot straddle two fields.
const FIELD_SEPARATOR: char = '\u{1f}';

/// Prime modulus of the home page shuffle.
const SHUFFLE_MODULUS: i64 = 2_147_483_647;

/// Lower-cases `text` for storage in a search column or for matching.
pub fn fold(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control())
        .flat_map(char::to_lowercase)
        .collect()
}

fn fold_fields<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> String {
    let folded: Vec<String> = parts.into_iter().flatten().map(fold).collect();
    folded.join(&FIELD_SEPARATOR.to_string())
}

/// Value of `name_search`: name, both genres, other and location.
pub fn name_search_text(fields: &ListingFields) -> String {
    fold_fields([
        Some(fields.name.as_str()),
        Some(fields.main_genre.as_str()),
        fields.sub_genre.as_deref(),
        fields.other.as_deref(),
        fields.location.as_deref(),
    ])
}

/// Value of `genre_search`: main and sub genre.
pub fn genre_search_text(fields: &ListingFields) -> String {
    fold_fields([Some(fields.main_genre.as_str()), fields.sub_genre.as_deref()])
}

/// Escapes LIKE metacharacters in `term`.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// "search column contains term", both sides folded.
fn contains(column: listing::Column, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&fold(term)));
    Expr::col((listing::Entity, column)).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

/// WHERE clause for `filter`: the name term must occur in one of the text
/// fields, and at least one genre term in the main or sub genre.
/// Tags never restrict the result set; they only rank it.
pub fn search_condition(filter: &SearchFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(name) = &filter.name {
        condition = condition.add(contains(listing::Column::NameSearch, name));
    }

    if !filter.genres.is_empty() {
        let any_genre = filter.genres.iter().fold(Condition::any(), |cond, genre| {
            cond.add(contains(listing::Column::GenreSearch, genre))
        });
        condition = condition.add(any_genre);
    }

    condition
}

/// Correlated subquery counting how many of `tags` the outer listing
/// carries. Membership is exact: "art" does not match "martial-arts".
pub fn tag_match_count(tags: &[String]) -> SimpleExpr {
    let subquery = Query::select()
        .expr(Expr::col((listing_tag::Entity, listing_tag::Column::Tag)).count())
        .from(listing_tag::Entity)
        .and_where(
            Expr::col((listing_tag::Entity, listing_tag::Column::ListingId))
                .equals((listing::Entity, listing::Column::Id)),
        )
        .and_where(
            Expr::col((listing_tag::Entity, listing_tag::Column::Tag)).is_in(tags.iter().cloned()),
        )
        .to_owned();

    SimpleExpr::SubQuery(None, Box::new(subquery.into_sub_query_statement()))
}

/// Listings matching `filter`, without ordering or paging.
pub fn filtered(filter: &SearchFilter) -> Select<listing::Entity> {
    let condition = search_condition(filter);
    let query = listing::Entity::find();
    if condition.is_empty() {
        query
    } else {
        query.filter(condition)
    }
}

/// Result ordering: most matching tags first when tags were given, then
/// ascending id so pages are stable.
pub fn ranked(query: Select<listing::Entity>, filter: &SearchFilter) -> Select<listing::Entity> {
    let query = if filter.tags.is_empty() {
        query
    } else {
        query.order_by(tag_match_count(&filter.tags), Order::Desc)
    };
    query.order_by_asc(listing::Column::Id)
}

/// Multiplier and offset of the shuffle for `seed`. The multiplier is
/// never zero, so with a prime modulus every seed yields a permutation.
pub fn shuffle_params(seed: i64) -> (i64, i64) {
    let mut rng = StdRng::seed_from_u64(seed as u64);
    let multiplier = rng.gen_range(1..SHUFFLE_MODULUS);
    let offset = rng.gen_range(0..SHUFFLE_MODULUS);
    (multiplier, offset)
}

/// Sort key `(id * k + c) mod p` that reorders the home page once per
/// `seed` (the day number) while staying stable within the day.
pub fn daily_shuffle_key(seed: i64) -> SimpleExpr {
    let (multiplier, offset) = shuffle_params(seed);

    let id: SimpleExpr = Expr::col((listing::Entity, listing::Column::Id)).into();
    let scaled = binary(id, BinOper::Mul, Expr::val(multiplier).into());
    let shifted = binary(scaled, BinOper::Add, Expr::val(offset).into());
    binary(shifted, BinOper::Mod, Expr::val(SHUFFLE_MODULUS).into())
}

fn binary(left: SimpleExpr, op: BinOper, right: SimpleExpr) -> SimpleExpr {
    SimpleExpr::Binary(Box::new(left), op, Box::new(right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::Value;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(filter: &SearchFilter) -> String {
        ranked(filtered(filter), filter)
            .build(DbBackend::Sqlite)
            .sql
    }

    #[test]
    fn wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50!%!_off");
        assert_eq!(escape_like("wow!"), "wow!!");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn folding_handles_non_ascii_letters() {
        assert_eq!(fold("École"), "école");
        assert_eq!(fold("ÉCOLE"), fold("école"));
        assert_eq!(fold("ＡＢＣ"), "ａｂｃ");
        assert_eq!(fold("tab\there"), "tabhere");
    }

    #[test]
    fn search_text_keeps_fields_apart() {
        let fields = ListingFields {
            name: "Board Games".into(),
            comment: None,
            main_genre: "Culture".into(),
            sub_genre: None,
            other: None,
            tags: Vec::new(),
            description: None,
            admission_fee: None,
            annual_fee: None,
            location: Some("Room 4".into()),
            instagram: None,
            sliders: Default::default(),
        };
        let text = name_search_text(&fields);
        assert!(text.contains("board games"));
        assert!(text.contains("room 4"));
        assert!(!text.contains("games culture"));
        assert_eq!(genre_search_text(&fields), "culture");
    }

    #[test]
    fn empty_filter_has_no_where_clause() {
        let filter = SearchFilter::default();
        let sql = sql(&filter);
        assert!(!sql.contains("WHERE"), "{sql}");
        assert!(sql.contains("ORDER BY \"listings\".\"id\" ASC"), "{sql}");
    }

    #[test]
    fn name_term_uses_the_folded_search_column() {
        let filter = SearchFilter::new(Some("chess"), Vec::<&str>::new(), Vec::<&str>::new(), 1);
        let sql = sql(&filter);
        assert_eq!(sql.matches("LIKE").count(), 1, "{sql}");
        assert!(sql.contains("\"name_search\""), "{sql}");
        assert!(sql.contains("ESCAPE"), "{sql}");
    }

    #[test]
    fn genres_are_or_ed() {
        let filter = SearchFilter::new(None, ["Sports", "Music"], Vec::<&str>::new(), 1);
        let sql = sql(&filter);
        assert_eq!(sql.matches("LIKE").count(), 2, "{sql}");
        assert!(sql.contains("\"genre_search\""), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
    }

    #[test]
    fn tags_only_affect_ordering() {
        let filter = SearchFilter::new(None, Vec::<&str>::new(), ["weekly", "beginner"], 1);
        let sql = sql(&filter);
        assert!(!sql.contains("WHERE \"listings\""), "{sql}");
        assert!(sql.contains("\"listing_tags\""), "{sql}");
        assert!(sql.contains("DESC"), "{sql}");
    }

    #[test]
    fn shuffle_params_depend_on_the_seed() {
        assert_eq!(shuffle_params(739_000), shuffle_params(739_000));
        assert_ne!(shuffle_params(739_000).0, shuffle_params(739_001).0);
        for seed in 739_000..739_010 {
            let (multiplier, offset) = shuffle_params(seed);
            assert!((1..SHUFFLE_MODULUS).contains(&multiplier));
            assert!((0..SHUFFLE_MODULUS).contains(&offset));
        }
    }

    #[test]
    fn shuffle_key_binds_its_parameters() {
        let (multiplier, offset) = shuffle_params(739_000);
        let stmt = listing::Entity::find()
            .order_by(daily_shuffle_key(739_000), Order::Asc)
            .build(DbBackend::Sqlite);

        let values = stmt.values.expect("bound values").0;
        assert!(values.contains(&Value::BigInt(Some(multiplier))), "{values:?}");
        assert!(values.contains(&Value::BigInt(Some(offset))), "{values:?}");
        assert!(!stmt.sql.contains(&multiplier.to_string()), "{}", stmt.sql);
    }

    #[test]
    fn user_input_is_never_inlined() {
        let hostile = "x'; DROP TABLE listings; --";
        let filter = SearchFilter::new(Some(hostile), [hostile], [hostile], 1);
        let stmt = ranked(filtered(&filter), &filter).build(DbBackend::Sqlite);
        assert!(!stmt.sql.contains("DROP TABLE"), "{}", stmt.sql);
        assert!(stmt.values.is_some());
    }
}
