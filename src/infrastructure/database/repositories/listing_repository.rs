//! SeaORM implementation of ListingRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Order;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::domain::{
    DomainError, DomainResult, Listing, ListingFields, ListingPhotos, ListingRepository,
    ListingUpdate, NewListing, PhotoKind, SearchFilter,
};
use crate::infrastructure::database::entities::{daily_view, listing, listing_photo, listing_tag};
use crate::infrastructure::database::search_query;
use crate::shared::{page_offset, PaginatedResult, PAGE_SIZE};

pub struct SeaOrmListingRepository {
    db: DatabaseConnection,
}

impl SeaOrmListingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn db_err(e: DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

fn kind_to_entity(kind: PhotoKind) -> listing_photo::PhotoKind {
    match kind {
        PhotoKind::Top => listing_photo::PhotoKind::Top,
        PhotoKind::Sub => listing_photo::PhotoKind::Sub,
        PhotoKind::Calendar => listing_photo::PhotoKind::Calendar,
    }
}

fn kind_from_entity(kind: listing_photo::PhotoKind) -> PhotoKind {
    match kind {
        listing_photo::PhotoKind::Top => PhotoKind::Top,
        listing_photo::PhotoKind::Sub => PhotoKind::Sub,
        listing_photo::PhotoKind::Calendar => PhotoKind::Calendar,
    }
}

fn listing_model_to_domain(model: listing::Model, tags: Vec<String>, photos: ListingPhotos) -> Listing {
    let sliders = model.sliders();
    Listing {
        id: model.id,
        name: model.name,
        comment: model.comment,
        main_genre: model.main_genre,
        sub_genre: model.sub_genre,
        other: model.other,
        tags,
        description: model.description,
        admission_fee: model.admission_fee,
        annual_fee: model.annual_fee,
        location: model.location,
        instagram: model.instagram,
        sliders,
        photos,
        created_by: model.created_by,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn apply_fields(am: &mut listing::ActiveModel, fields: &ListingFields) {
    am.name = Set(fields.name.clone());
    am.comment = Set(fields.comment.clone());
    am.main_genre = Set(fields.main_genre.clone());
    am.sub_genre = Set(fields.sub_genre.clone());
    am.other = Set(fields.other.clone());
    am.description = Set(fields.description.clone());
    am.admission_fee = Set(fields.admission_fee);
    am.annual_fee = Set(fields.annual_fee);
    am.location = Set(fields.location.clone());
    am.instagram = Set(fields.instagram.clone());
    am.name_search = Set(search_query::name_search_text(fields));
    am.genre_search = Set(search_query::genre_search_text(fields));
    am.slider1 = Set(fields.sliders[0]);
    am.slider2 = Set(fields.sliders[1]);
    am.slider3 = Set(fields.sliders[2]);
    am.slider4 = Set(fields.sliders[3]);
}

/// Loads tags and photos for `models` and builds domain listings,
/// preserving the input order.
async fn hydrate<C: ConnectionTrait>(db: &C, models: Vec<listing::Model>) -> Result<Vec<Listing>, DbErr> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();

    let tags = listing_tag::Entity::find()
        .filter(listing_tag::Column::ListingId.is_in(ids.clone()))
        .order_by_asc(listing_tag::Column::Position)
        .all(db)
        .await?;
    let mut tags_by_listing: HashMap<i32, Vec<String>> = HashMap::new();
    for tag in tags {
        tags_by_listing.entry(tag.listing_id).or_default().push(tag.tag);
    }

    let photos = listing_photo::Entity::find()
        .filter(listing_photo::Column::ListingId.is_in(ids))
        .order_by_asc(listing_photo::Column::Position)
        .all(db)
        .await?;
    let mut photos_by_listing: HashMap<i32, ListingPhotos> = HashMap::new();
    for photo in photos {
        let entry = photos_by_listing.entry(photo.listing_id).or_default();
        match kind_from_entity(photo.kind) {
            PhotoKind::Top => {
                if entry.top.is_none() {
                    entry.top = Some(photo.file_name);
                }
            }
            PhotoKind::Sub => entry.sub.push(photo.file_name),
            PhotoKind::Calendar => entry.calendar.push(photo.file_name),
        }
    }

    Ok(models
        .into_iter()
        .map(|m| {
            let tags = tags_by_listing.remove(&m.id).unwrap_or_default();
            let photos = photos_by_listing.remove(&m.id).unwrap_or_default();
            listing_model_to_domain(m, tags, photos)
        })
        .collect())
}

async fn insert_tags<C: ConnectionTrait>(db: &C, listing_id: i32, tags: &[String]) -> Result<(), DbErr> {
    if tags.is_empty() {
        return Ok(());
    }
    let rows = tags.iter().enumerate().map(|(i, tag)| listing_tag::ActiveModel {
        listing_id: Set(listing_id),
        tag: Set(tag.clone()),
        position: Set(i as i32),
    });
    listing_tag::Entity::insert_many(rows)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

async fn insert_photos<C: ConnectionTrait>(
    db: &C,
    listing_id: i32,
    kind: PhotoKind,
    files: &[String],
) -> Result<(), DbErr> {
    let files = &files[..files.len().min(kind.max_files())];
    if files.is_empty() {
        return Ok(());
    }
    let rows = files.iter().enumerate().map(|(i, file)| listing_photo::ActiveModel {
        listing_id: Set(listing_id),
        kind: Set(kind_to_entity(kind)),
        position: Set(i as i32),
        file_name: Set(file.clone()),
        ..Default::default()
    });
    listing_photo::Entity::insert_many(rows)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl ListingRepository for SeaOrmListingRepository {
    async fn search(&self, filter: &SearchFilter) -> DomainResult<PaginatedResult<Listing>> {
        let query = search_query::filtered(filter);
        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let models = search_query::ranked(query, filter)
            .offset(filter.offset())
            .limit(u64::from(filter.limit()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let items = hydrate(&self.db, models).await.map_err(db_err)?;

        Ok(PaginatedResult::new(items, total, filter.page, filter.limit()))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Listing>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = listing::Entity::find()
            .filter(listing::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(listing::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        hydrate(&self.db, models).await.map_err(db_err)
    }

    async fn shuffled_page(&self, page: u32, seed: i64) -> DomainResult<PaginatedResult<Listing>> {
        let page = page.max(1);
        let total = listing::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)?;

        let models = listing::Entity::find()
            .order_by(search_query::daily_shuffle_key(seed), Order::Asc)
            .order_by_asc(listing::Column::Id)
            .offset(page_offset(page, PAGE_SIZE))
            .limit(u64::from(PAGE_SIZE))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let items = hydrate(&self.db, models).await.map_err(db_err)?;

        Ok(PaginatedResult::new(items, total, page, PAGE_SIZE))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Listing>> {
        let Some(model) = listing::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };
        let mut listings = hydrate(&self.db, vec![model]).await.map_err(db_err)?;
        Ok(listings.pop())
    }

    async fn find_secret_hash(&self, id: i32) -> DomainResult<Option<String>> {
        listing::Entity::find_by_id(id)
            .select_only()
            .column(listing::Column::SecretHash)
            .into_tuple::<String>()
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    async fn create(&self, new: NewListing) -> DomainResult<i32> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let now = Utc::now();

        let mut am = listing::ActiveModel {
            secret_hash: Set(new.secret_hash),
            created_by: Set(new.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_fields(&mut am, &new.fields);
        let model = am.insert(&txn).await.map_err(db_err)?;

        insert_tags(&txn, model.id, &new.fields.tags)
            .await
            .map_err(db_err)?;
        for kind in PhotoKind::ALL {
            insert_photos(&txn, model.id, kind, &new.photos.get(kind))
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        Ok(model.id)
    }

    async fn update(&self, id: i32, update: ListingUpdate) -> DomainResult<Vec<String>> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = listing::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::listing_not_found(id))?;

        let mut am: listing::ActiveModel = existing.into();
        apply_fields(&mut am, &update.fields);
        if let Some(hash) = update.secret_hash {
            am.secret_hash = Set(hash);
        }
        am.updated_at = Set(Utc::now());
        am.update(&txn).await.map_err(db_err)?;

        listing_tag::Entity::delete_many()
            .filter(listing_tag::Column::ListingId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        insert_tags(&txn, id, &update.fields.tags)
            .await
            .map_err(db_err)?;

        let mut replaced = Vec::new();
        for (kind, files) in update.photos {
            let slot = listing_photo::Column::Kind.eq(kind_to_entity(kind));
            let old = listing_photo::Entity::find()
                .filter(listing_photo::Column::ListingId.eq(id))
                .filter(slot.clone())
                .all(&txn)
                .await
                .map_err(db_err)?;
            replaced.extend(old.into_iter().map(|p| p.file_name));

            listing_photo::Entity::delete_many()
                .filter(listing_photo::Column::ListingId.eq(id))
                .filter(slot)
                .exec(&txn)
                .await
                .map_err(db_err)?;
            insert_photos(&txn, id, kind, &files)
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        Ok(replaced)
    }

    async fn delete(&self, id: i32) -> DomainResult<Vec<String>> {
        let txn = self.db.begin().await.map_err(db_err)?;

        if listing::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .is_none()
        {
            return Err(DomainError::listing_not_found(id));
        }

        let files: Vec<String> = listing_photo::Entity::find()
            .filter(listing_photo::Column::ListingId.eq(id))
            .all(&txn)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|p| p.file_name)
            .collect();

        daily_view::Entity::delete_many()
            .filter(daily_view::Column::ListingId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        listing_photo::Entity::delete_many()
            .filter(listing_photo::Column::ListingId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        listing_tag::Entity::delete_many()
            .filter(listing_tag::Column::ListingId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        listing::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(files)
    }

    async fn count(&self) -> DomainResult<u64> {
        listing::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
