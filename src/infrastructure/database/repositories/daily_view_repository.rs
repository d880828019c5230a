//! SeaORM implementation of DailyViewRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::sea_query::{Alias, BinOper, Expr, Func, OnConflict, Order, SimpleExpr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::domain::{
    DailyTotal, DailyView, DailyViewRepository, DomainError, DomainResult, ListingViewTotal,
};
use crate::infrastructure::database::entities::{daily_view, listing};

pub struct SeaOrmDailyViewRepository {
    db: DatabaseConnection,
}

impl SeaOrmDailyViewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

#[derive(Debug, FromQueryResult)]
struct DailyTotalRow {
    view_date: NaiveDate,
    total_views: i64,
}

#[derive(Debug, FromQueryResult)]
struct ListingTotalRow {
    id: i32,
    name: String,
    main_genre: String,
    total_views: i64,
}

/// `COALESCE(SUM(view_count), 0)`
fn view_count_sum() -> SimpleExpr {
    Func::coalesce([daily_view::Column::ViewCount.sum(), Expr::val(0).into()]).into()
}

#[async_trait]
impl DailyViewRepository for SeaOrmDailyViewRepository {
    async fn record_view(&self, listing_id: i32, date: NaiveDate) -> DomainResult<()> {
        let row = daily_view::ActiveModel {
            listing_id: Set(listing_id),
            view_date: Set(date),
            view_count: Set(1),
        };

        daily_view::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([daily_view::Column::ListingId, daily_view::Column::ViewDate])
                    .value(
                        daily_view::Column::ViewCount,
                        SimpleExpr::Binary(
                            Box::new(Expr::col((daily_view::Entity, daily_view::Column::ViewCount)).into()),
                            BinOper::Add,
                            Box::new(Expr::val(1).into()),
                        ),
                    )
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_for_listing_since(
        &self,
        listing_id: i32,
        since: NaiveDate,
    ) -> DomainResult<Vec<DailyView>> {
        let rows = daily_view::Entity::find()
            .filter(daily_view::Column::ListingId.eq(listing_id))
            .filter(daily_view::Column::ViewDate.gte(since))
            .order_by_asc(daily_view::Column::ViewDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|r| DailyView {
                listing_id: r.listing_id,
                view_date: r.view_date,
                view_count: r.view_count,
            })
            .collect())
    }

    async fn total_views(&self) -> DomainResult<i64> {
        let total = daily_view::Entity::find()
            .select_only()
            .column_as(view_count_sum(), "total_views")
            .into_tuple::<i64>()
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(total.unwrap_or(0))
    }

    async fn totals_by_day(&self) -> DomainResult<Vec<DailyTotal>> {
        let rows = daily_view::Entity::find()
            .select_only()
            .column(daily_view::Column::ViewDate)
            .column_as(view_count_sum(), "total_views")
            .group_by(daily_view::Column::ViewDate)
            .order_by_asc(daily_view::Column::ViewDate)
            .into_model::<DailyTotalRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|r| DailyTotal {
                view_date: r.view_date,
                total_views: r.total_views,
            })
            .collect())
    }

    async fn listing_totals(&self) -> DomainResult<Vec<ListingViewTotal>> {
        let rows = listing::Entity::find()
            .select_only()
            .column(listing::Column::Id)
            .column(listing::Column::Name)
            .column(listing::Column::MainGenre)
            .column_as(view_count_sum(), "total_views")
            .join(JoinType::LeftJoin, listing::Relation::DailyViews.def())
            .group_by(listing::Column::Id)
            .group_by(listing::Column::Name)
            .group_by(listing::Column::MainGenre)
            .order_by(SimpleExpr::from(Expr::col(Alias::new("total_views"))), Order::Desc)
            .order_by_asc(listing::Column::Id)
            .into_model::<ListingTotalRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|r| ListingViewTotal {
                listing_id: r.id,
                name: r.name,
                main_genre: r.main_genre,
                total_views: r.total_views,
            })
            .collect())
    }
}
