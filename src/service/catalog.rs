//! Catalog service: CRUD and filtered listing for parks, lodges,
//! tours, and users.
//!
//! Read-mostly reference data. Reference-integrity checks happen on
//! create (a tour needs an existing active park, a lodge needs an
//! existing park); capacity fields are never writable through this
//! service — those belong to the reservation flow.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    Coordinates, Difficulty, DomainEvent, EntityStore, EventBus, Lodge, LodgeId, LodgeType, Park,
    ParkId, RatingStats, StartDate, Tour, TourId, User, UserId, UserRole,
};
use crate::error::ApiError;

/// Input for [`CatalogService::create_tour`].
#[derive(Debug, Clone)]
pub struct NewTour {
    /// Tour title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Park the tour visits.
    pub park: ParkId,
    /// Length in days.
    pub duration_days: u32,
    /// Price per participant in USD.
    pub price_usd: f64,
    /// Total capacity.
    pub max_participants: u32,
    /// Physical difficulty.
    pub difficulty: Difficulty,
    /// What the price includes.
    pub includes: Vec<String>,
    /// What the price excludes.
    pub excludes: Vec<String>,
    /// Search tags.
    pub tags: Vec<String>,
    /// Cancellation policy; the default applies when `None`.
    pub cancellation_policy: Option<String>,
    /// Scheduled departures.
    pub start_dates: Vec<StartDate>,
}

/// Partial update for a tour. `None` fields are left untouched.
/// Capacity counters are deliberately absent.
#[derive(Debug, Clone, Default)]
pub struct TourUpdate {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New price per participant.
    pub price_usd: Option<f64>,
    /// New difficulty.
    pub difficulty: Option<Difficulty>,
    /// Replacement includes list.
    pub includes: Option<Vec<String>>,
    /// Replacement excludes list.
    pub excludes: Option<Vec<String>>,
    /// Replacement tags.
    pub tags: Option<Vec<String>>,
    /// New cancellation policy.
    pub cancellation_policy: Option<String>,
    /// Open or withdraw the tour from sale.
    pub is_available: Option<bool>,
}

/// Listing filter for [`CatalogService::list_tours`]. All criteria are
/// conjunctive; `None` means "any".
#[derive(Debug, Clone, Default)]
pub struct TourFilter {
    /// Restrict to one park.
    pub park: Option<ParkId>,
    /// Restrict to one agency.
    pub agency: Option<UserId>,
    /// Case-insensitive substring over title, description, and tags.
    pub search: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
    /// Inclusive lower duration bound in days.
    pub min_duration: Option<u32>,
    /// Inclusive upper duration bound in days.
    pub max_duration: Option<u32>,
}

impl TourFilter {
    fn matches(&self, tour: &Tour) -> bool {
        if !tour.is_active {
            return false;
        }
        if let Some(park) = self.park
            && tour.park != park
        {
            return false;
        }
        if let Some(agency) = self.agency
            && tour.agency != agency
        {
            return false;
        }
        if let Some(min) = self.min_price
            && tour.price_usd < min
        {
            return false;
        }
        if let Some(max) = self.max_price
            && tour.price_usd > max
        {
            return false;
        }
        if let Some(min) = self.min_duration
            && tour.duration_days < min
        {
            return false;
        }
        if let Some(max) = self.max_duration
            && tour.duration_days > max
        {
            return false;
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_text = tour.title.to_lowercase().contains(&needle)
                || tour.description.to_lowercase().contains(&needle)
                || tour.tags.iter().any(|t| t.to_lowercase().contains(&needle));
            if !in_text {
                return false;
            }
        }
        true
    }
}

/// Input for [`CatalogService::create_park`].
#[derive(Debug, Clone)]
pub struct NewPark {
    /// Park name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Human-readable location.
    pub location: String,
    /// Geographic position.
    pub coordinates: Coordinates,
    /// Area in square kilometres.
    pub area_km2: f64,
    /// Year established.
    pub established_year: u32,
    /// Entry fee per person in USD.
    pub entry_fee_usd: f64,
    /// Notable wildlife.
    pub wildlife: Vec<String>,
    /// Recommended visiting season.
    pub best_time_to_visit: String,
}

/// Partial update for a park. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ParkUpdate {
    /// New description.
    pub description: Option<String>,
    /// New entry fee.
    pub entry_fee_usd: Option<f64>,
    /// Replacement wildlife list.
    pub wildlife: Option<Vec<String>>,
    /// New recommended season.
    pub best_time_to_visit: Option<String>,
}

/// Input for [`CatalogService::create_lodge`].
#[derive(Debug, Clone)]
pub struct NewLodge {
    /// Lodge name.
    pub name: String,
    /// Human-readable location.
    pub location: String,
    /// Park the lodge serves.
    pub park: ParkId,
    /// Accommodation category.
    pub lodge_type: LodgeType,
    /// Guest capacity.
    pub capacity: u32,
    /// Nightly rate in USD.
    pub price_per_night_usd: f64,
    /// Offered amenities.
    pub amenities: Vec<String>,
    /// Description.
    pub description: String,
    /// Booking contact email.
    pub contact_email: String,
    /// Booking contact phone.
    pub contact_phone: String,
    /// Geographic position.
    pub coordinates: Coordinates,
}

/// Input for [`CatalogService::register_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Email address, unique across the marketplace.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Marketplace role.
    pub role: UserRole,
}

/// Partial profile update. `None` fields are left untouched; email and
/// role are immutable after registration.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
}

/// Orchestration layer for catalog CRUD.
#[derive(Debug, Clone)]
pub struct CatalogService {
    store: Arc<EntityStore>,
    event_bus: EventBus,
}

impl CatalogService {
    /// Creates a new `CatalogService`.
    #[must_use]
    pub fn new(store: Arc<EntityStore>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    // --- tours ---

    /// Lists a new tour for an agency.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Forbidden`] unless the caller is a travel agency.
    /// - [`ApiError::NotFound`] / [`ApiError::Unavailable`] if the park
    ///   does not exist or is inactive.
    /// - [`ApiError::InvalidInput`] on violated field bounds.
    pub async fn create_tour(&self, caller: UserId, req: NewTour) -> Result<Tour, ApiError> {
        self.ensure_role(caller, UserRole::TravelAgency).await?;

        let park_lock = self.store.parks.get(req.park).await?;
        if !park_lock.read().await.is_active {
            return Err(ApiError::Unavailable);
        }

        let now = Utc::now();
        let tour = Tour {
            id: TourId::new(),
            title: req.title,
            description: req.description,
            park: req.park,
            agency: caller,
            duration_days: req.duration_days,
            price_usd: req.price_usd,
            max_participants: req.max_participants,
            current_participants: 0,
            difficulty: req.difficulty,
            includes: req.includes,
            excludes: req.excludes,
            tags: req.tags.iter().map(|t| t.to_lowercase()).collect(),
            cancellation_policy: req
                .cancellation_policy
                .unwrap_or_else(|| Tour::DEFAULT_CANCELLATION_POLICY.to_string()),
            is_active: true,
            is_available: true,
            start_dates: req.start_dates,
            rating: RatingStats::new(),
            created_at: now,
            updated_at: now,
        };
        tour.validate()?;

        self.store.tours.insert(tour.id, tour.clone()).await?;

        let _ = self.event_bus.publish(DomainEvent::TourCreated {
            tour_id: tour.id,
            park_id: tour.park,
            agency_id: caller,
            timestamp: now,
        });

        tracing::info!(tour_id = %tour.id, agency_id = %caller, "tour created");
        Ok(tour)
    }

    /// Fetches a single tour.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown or inactive tour.
    pub async fn get_tour(&self, tour_id: TourId) -> Result<Tour, ApiError> {
        let tour_lock = self.store.tours.get(tour_id).await?;
        let tour = tour_lock.read().await;
        if !tour.is_active {
            return Err(ApiError::NotFound {
                kind: "tour",
                id: tour_id.into(),
            });
        }
        Ok(tour.clone())
    }

    /// Lists active tours matching the filter, newest first.
    pub async fn list_tours(&self, filter: &TourFilter) -> Vec<Tour> {
        let mut tours = self
            .store
            .tours
            .filter_map(|t| filter.matches(t).then(|| t.clone()))
            .await;
        tours.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tours
    }

    /// Applies a partial update to a tour.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Forbidden`] unless the caller is the owning agency.
    /// - [`ApiError::InvalidInput`] if the update violates field bounds;
    ///   nothing is mutated.
    pub async fn update_tour(
        &self,
        caller: UserId,
        tour_id: TourId,
        update: TourUpdate,
    ) -> Result<Tour, ApiError> {
        let tour_lock = self.store.tours.get(tour_id).await?;
        let mut tour = tour_lock.write().await;
        if tour.agency != caller {
            return Err(ApiError::Forbidden(
                "only the owning agency can update this tour".to_string(),
            ));
        }

        // Validate against a candidate copy so a rejected update leaves
        // the stored tour untouched.
        let mut candidate = tour.clone();
        if let Some(title) = update.title {
            candidate.title = title;
        }
        if let Some(description) = update.description {
            candidate.description = description;
        }
        if let Some(price) = update.price_usd {
            candidate.price_usd = price;
        }
        if let Some(difficulty) = update.difficulty {
            candidate.difficulty = difficulty;
        }
        if let Some(includes) = update.includes {
            candidate.includes = includes;
        }
        if let Some(excludes) = update.excludes {
            candidate.excludes = excludes;
        }
        if let Some(tags) = update.tags {
            candidate.tags = tags.iter().map(|t| t.to_lowercase()).collect();
        }
        if let Some(policy) = update.cancellation_policy {
            candidate.cancellation_policy = policy;
        }
        if let Some(available) = update.is_available {
            candidate.is_available = available;
        }
        candidate.updated_at = Utc::now();
        candidate.validate()?;

        *tour = candidate;
        Ok(tour.clone())
    }

    /// Soft-deletes a tour. It disappears from every listing but its
    /// bookings keep working.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] unless the caller is the owning
    /// agency.
    pub async fn deactivate_tour(&self, caller: UserId, tour_id: TourId) -> Result<(), ApiError> {
        let tour_lock = self.store.tours.get(tour_id).await?;
        let mut tour = tour_lock.write().await;
        if tour.agency != caller {
            return Err(ApiError::Forbidden(
                "only the owning agency can deactivate this tour".to_string(),
            ));
        }
        tour.is_active = false;
        tour.is_available = false;
        tour.updated_at = Utc::now();
        tracing::info!(%tour_id, "tour deactivated");
        Ok(())
    }

    // --- parks ---

    /// Adds a park to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] on violated field bounds.
    pub async fn create_park(&self, req: NewPark) -> Result<Park, ApiError> {
        let now = Utc::now();
        let park = Park {
            id: ParkId::new(),
            name: req.name,
            description: req.description,
            location: req.location,
            coordinates: req.coordinates,
            area_km2: req.area_km2,
            established_year: req.established_year,
            entry_fee_usd: req.entry_fee_usd,
            wildlife: req.wildlife,
            best_time_to_visit: req.best_time_to_visit,
            is_active: true,
            rating: RatingStats::new(),
            created_at: now,
            updated_at: now,
        };
        park.validate()?;
        self.store.parks.insert(park.id, park.clone()).await?;
        tracing::info!(park_id = %park.id, "park created");
        Ok(park)
    }

    /// Fetches a single park.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    pub async fn get_park(&self, park_id: ParkId) -> Result<Park, ApiError> {
        let park_lock = self.store.parks.get(park_id).await?;
        Ok(park_lock.read().await.clone())
    }

    /// Lists all active parks, alphabetically.
    pub async fn list_parks(&self) -> Vec<Park> {
        let mut parks = self
            .store
            .parks
            .filter_map(|p| p.is_active.then(|| p.clone()))
            .await;
        parks.sort_by(|a, b| a.name.cmp(&b.name));
        parks
    }

    /// Applies a partial update to a park.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] if the update violates field
    /// bounds; nothing is mutated.
    pub async fn update_park(&self, park_id: ParkId, update: ParkUpdate) -> Result<Park, ApiError> {
        let park_lock = self.store.parks.get(park_id).await?;
        let mut park = park_lock.write().await;

        let mut candidate = park.clone();
        if let Some(description) = update.description {
            candidate.description = description;
        }
        if let Some(fee) = update.entry_fee_usd {
            candidate.entry_fee_usd = fee;
        }
        if let Some(wildlife) = update.wildlife {
            candidate.wildlife = wildlife;
        }
        if let Some(season) = update.best_time_to_visit {
            candidate.best_time_to_visit = season;
        }
        candidate.updated_at = Utc::now();
        candidate.validate()?;

        *park = candidate;
        Ok(park.clone())
    }

    // --- lodges ---

    /// Lists a new lodge for a lodge owner.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Forbidden`] unless the caller is a lodge owner.
    /// - [`ApiError::NotFound`] if the park does not exist.
    /// - [`ApiError::InvalidInput`] on violated field bounds.
    pub async fn create_lodge(&self, caller: UserId, req: NewLodge) -> Result<Lodge, ApiError> {
        self.ensure_role(caller, UserRole::LodgeOwner).await?;
        if !self.store.parks.contains(req.park).await {
            return Err(ApiError::NotFound {
                kind: "park",
                id: req.park.into(),
            });
        }

        let now = Utc::now();
        let lodge = Lodge {
            id: LodgeId::new(),
            name: req.name,
            location: req.location,
            park: req.park,
            owner: caller,
            lodge_type: req.lodge_type,
            capacity: req.capacity,
            price_per_night_usd: req.price_per_night_usd,
            amenities: req.amenities,
            description: req.description,
            contact_email: req.contact_email,
            contact_phone: req.contact_phone,
            coordinates: req.coordinates,
            is_active: true,
            rating: RatingStats::new(),
            created_at: now,
            updated_at: now,
        };
        lodge.validate()?;
        self.store.lodges.insert(lodge.id, lodge.clone()).await?;
        tracing::info!(lodge_id = %lodge.id, owner_id = %caller, "lodge created");
        Ok(lodge)
    }

    /// Fetches a single lodge.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    pub async fn get_lodge(&self, lodge_id: LodgeId) -> Result<Lodge, ApiError> {
        let lodge_lock = self.store.lodges.get(lodge_id).await?;
        Ok(lodge_lock.read().await.clone())
    }

    /// Lists active lodges, optionally filtered by park and type.
    pub async fn list_lodges(
        &self,
        park: Option<ParkId>,
        lodge_type: Option<LodgeType>,
    ) -> Vec<Lodge> {
        let mut lodges = self
            .store
            .lodges
            .filter_map(|l| {
                let matches = l.is_active
                    && park.is_none_or(|p| l.park == p)
                    && lodge_type.is_none_or(|t| l.lodge_type == t);
                matches.then(|| l.clone())
            })
            .await;
        lodges.sort_by(|a, b| a.name.cmp(&b.name));
        lodges
    }

    // --- users ---

    /// Registers a new user account.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Conflict`] if the email is already registered.
    /// - [`ApiError::InvalidInput`] on violated field bounds.
    pub async fn register_user(&self, req: NewUser) -> Result<User, ApiError> {
        let email = req.email.trim().to_lowercase();
        if self.store.users.any(|u| u.email == email).await {
            return Err(ApiError::Conflict("email is already registered".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email,
            name: req.name,
            phone: req.phone,
            role: req.role,
            is_active: true,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };
        user.validate()?;
        self.store.users.insert(user.id, user.clone()).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Fetches a single user profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, ApiError> {
        let user_lock = self.store.users.get(user_id).await?;
        Ok(user_lock.read().await.clone())
    }

    /// Applies a partial update to the caller's own profile.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Forbidden`] when updating another user's profile.
    /// - [`ApiError::InvalidInput`] on violated field bounds; nothing is
    ///   mutated.
    pub async fn update_profile(
        &self,
        caller: UserId,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<User, ApiError> {
        if caller != user_id {
            return Err(ApiError::Forbidden(
                "profiles can only be updated by their owner".to_string(),
            ));
        }
        let user_lock = self.store.users.get(user_id).await?;
        let mut user = user_lock.write().await;

        let mut candidate = user.clone();
        if let Some(name) = update.name {
            candidate.name = name;
        }
        if let Some(phone) = update.phone {
            candidate.phone = phone;
        }
        candidate.updated_at = Utc::now();
        candidate.validate()?;

        *user = candidate;
        Ok(user.clone())
    }

    /// Lists active travel agencies, alphabetically. Public directory
    /// used to discover agency ids for the tour listing filter.
    pub async fn list_agencies(&self) -> Vec<User> {
        let mut agencies = self
            .store
            .users
            .filter_map(|u| (u.role == UserRole::TravelAgency && u.is_active).then(|| u.clone()))
            .await;
        agencies.sort_by(|a, b| a.name.cmp(&b.name));
        agencies
    }

    /// Fetches a single travel agency profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] unless the id names an active
    /// user with the travel agency role.
    pub async fn get_agency(&self, user_id: UserId) -> Result<User, ApiError> {
        let user_lock = self.store.users.get(user_id).await?;
        let user = user_lock.read().await;
        if user.role != UserRole::TravelAgency || !user.is_active {
            return Err(ApiError::NotFound {
                kind: "agency",
                id: user_id.into(),
            });
        }
        Ok(user.clone())
    }

    async fn ensure_role(&self, caller: UserId, role: UserRole) -> Result<(), ApiError> {
        let user_lock = self.store.users.get(caller).await?;
        let user = user_lock.read().await;
        if !user.is_active {
            return Err(ApiError::Forbidden("user account is inactive".to_string()));
        }
        if user.role != role {
            return Err(ApiError::Forbidden(format!(
                "requires the {role} role"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::park::tests::make_park;
    use crate::domain::tour::tests::date;
    use crate::domain::user::tests::make_user;

    fn new_tour(park: ParkId) -> NewTour {
        NewTour {
            title: "Serengeti Classic".to_string(),
            description: "Five days across the central Serengeti".to_string(),
            park,
            duration_days: 5,
            price_usd: 1200.0,
            max_participants: 10,
            difficulty: Difficulty::Moderate,
            includes: vec!["park fees".to_string()],
            excludes: vec![],
            tags: vec!["Serengeti".to_string(), "Migration".to_string()],
            cancellation_policy: None,
            start_dates: vec![StartDate {
                date: date(2026, 9, 1),
                available_spots: 10,
            }],
        }
    }

    async fn seeded_service() -> (CatalogService, User, Park) {
        let store = Arc::new(EntityStore::new());
        let service = CatalogService::new(Arc::clone(&store), EventBus::new(1000));

        let agency = make_user(UserRole::TravelAgency);
        let _ = store.users.insert(agency.id, agency.clone()).await;
        let park = make_park();
        let _ = store.parks.insert(park.id, park.clone()).await;

        (service, agency, park)
    }

    #[tokio::test]
    async fn create_tour_requires_agency_role() {
        let (service, _, park) = seeded_service().await;
        let tourist = make_user(UserRole::Tourist);
        let _ = service.store.users.insert(tourist.id, tourist.clone()).await;

        let result = service.create_tour(tourist.id, new_tour(park.id)).await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn create_tour_lowercases_tags_and_defaults_policy() {
        let (service, agency, park) = seeded_service().await;

        let Ok(tour) = service.create_tour(agency.id, new_tour(park.id)).await else {
            panic!("tour creation failed");
        };
        assert_eq!(tour.tags, vec!["serengeti", "migration"]);
        assert_eq!(tour.cancellation_policy, Tour::DEFAULT_CANCELLATION_POLICY);
        assert_eq!(tour.agency, agency.id);
    }

    #[tokio::test]
    async fn create_tour_rejects_unknown_park() {
        let (service, agency, _) = seeded_service().await;

        let result = service.create_tour(agency.id, new_tour(ParkId::new())).await;
        assert!(matches!(result, Err(ApiError::NotFound { .. })));
    }

    #[tokio::test]
    async fn list_tours_applies_filters() {
        let (service, agency, park) = seeded_service().await;

        let mut cheap = new_tour(park.id);
        cheap.title = "Budget walk".to_string();
        cheap.price_usd = 200.0;
        let mut pricey = new_tour(park.id);
        pricey.price_usd = 3000.0;

        let _ = service.create_tour(agency.id, cheap).await;
        let _ = service.create_tour(agency.id, pricey).await;

        let all = service.list_tours(&TourFilter::default()).await;
        assert_eq!(all.len(), 2);

        let filtered = service
            .list_tours(&TourFilter {
                max_price: Some(1000.0),
                ..TourFilter::default()
            })
            .await;
        assert_eq!(filtered.len(), 1);

        let searched = service
            .list_tours(&TourFilter {
                search: Some("budget".to_string()),
                ..TourFilter::default()
            })
            .await;
        assert_eq!(searched.len(), 1);
    }

    #[tokio::test]
    async fn update_tour_is_owner_only_and_atomic() {
        let (service, agency, park) = seeded_service().await;
        let Ok(tour) = service.create_tour(agency.id, new_tour(park.id)).await else {
            panic!("tour creation failed");
        };

        let result = service
            .update_tour(UserId::new(), tour.id, TourUpdate::default())
            .await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));

        // A rejected update leaves the stored tour untouched
        let bad = TourUpdate {
            title: Some("x".repeat(101)),
            price_usd: Some(999.0),
            ..TourUpdate::default()
        };
        let result = service.update_tour(agency.id, tour.id, bad).await;
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
        let Ok(current) = service.get_tour(tour.id).await else {
            panic!("tour missing");
        };
        assert!((current.price_usd - 1200.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn deactivated_tour_disappears_from_listing() {
        let (service, agency, park) = seeded_service().await;
        let Ok(tour) = service.create_tour(agency.id, new_tour(park.id)).await else {
            panic!("tour creation failed");
        };

        let result = service.deactivate_tour(agency.id, tour.id).await;
        assert!(result.is_ok());

        assert!(service.list_tours(&TourFilter::default()).await.is_empty());
        assert!(matches!(
            service.get_tour(tour.id).await,
            Err(ApiError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn register_user_enforces_email_uniqueness() {
        let (service, _, _) = seeded_service().await;

        let req = NewUser {
            email: "asha@example.com".to_string(),
            name: "Asha".to_string(),
            phone: "+255 700 123 456".to_string(),
            role: UserRole::Tourist,
        };
        let first = service.register_user(req.clone()).await;
        assert!(first.is_ok());

        // Same address with different case still conflicts
        let mut dup = req;
        dup.email = "ASHA@example.com".to_string();
        let second = service.register_user(dup).await;
        assert!(matches!(second, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn update_profile_is_self_only() {
        let (service, _, _) = seeded_service().await;
        let Ok(user) = service
            .register_user(NewUser {
                email: "juma@example.com".to_string(),
                name: "Juma".to_string(),
                phone: "+255 700 222 333".to_string(),
                role: UserRole::Tourist,
            })
            .await
        else {
            panic!("registration failed");
        };

        let result = service
            .update_profile(UserId::new(), user.id, ProfileUpdate::default())
            .await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));

        let Ok(updated) = service
            .update_profile(
                user.id,
                user.id,
                ProfileUpdate {
                    name: Some("Juma K".to_string()),
                    phone: None,
                },
            )
            .await
        else {
            panic!("update failed");
        };
        assert_eq!(updated.name, "Juma K");
    }

    #[tokio::test]
    async fn agency_directory_lists_only_active_agencies() {
        let (service, agency, _) = seeded_service().await;
        let tourist = make_user(UserRole::Tourist);
        let mut retired = make_user(UserRole::TravelAgency);
        retired.is_active = false;
        let _ = service.store.users.insert(tourist.id, tourist).await;
        let _ = service.store.users.insert(retired.id, retired.clone()).await;

        let agencies = service.list_agencies().await;
        assert_eq!(agencies.len(), 1);
        let Some(listed) = agencies.first() else {
            panic!("agency missing");
        };
        assert_eq!(listed.id, agency.id);
    }

    #[tokio::test]
    async fn get_agency_rejects_non_agencies() {
        let (service, agency, _) = seeded_service().await;
        let tourist = make_user(UserRole::Tourist);
        let _ = service.store.users.insert(tourist.id, tourist.clone()).await;

        let result = service.get_agency(agency.id).await;
        assert!(result.is_ok());

        // Non-agency and unknown ids both read as not found
        assert!(matches!(
            service.get_agency(tourist.id).await,
            Err(ApiError::NotFound { .. })
        ));
        assert!(matches!(
            service.get_agency(UserId::new()).await,
            Err(ApiError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn create_lodge_requires_owner_role_and_existing_park() {
        let (service, agency, park) = seeded_service().await;
        let owner = make_user(UserRole::LodgeOwner);
        let _ = service.store.users.insert(owner.id, owner.clone()).await;

        let req = NewLodge {
            name: "Mara River Camp".to_string(),
            location: "Northern Serengeti".to_string(),
            park: park.id,
            lodge_type: LodgeType::TentedCamp,
            capacity: 24,
            price_per_night_usd: 320.0,
            amenities: vec![],
            description: "Tented camp overlooking the Mara river.".to_string(),
            contact_email: "stay@marariver.example".to_string(),
            contact_phone: "+255 700 111 222".to_string(),
            coordinates: Coordinates {
                latitude: -1.55,
                longitude: 34.9,
            },
        };

        let result = service.create_lodge(agency.id, req.clone()).await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));

        let mut bad_park = req.clone();
        bad_park.park = ParkId::new();
        let result = service.create_lodge(owner.id, bad_park).await;
        assert!(matches!(result, Err(ApiError::NotFound { .. })));

        let result = service.create_lodge(owner.id, req).await;
        assert!(result.is_ok());

        let listed = service
            .list_lodges(Some(park.id), Some(LodgeType::TentedCamp))
            .await;
        assert_eq!(listed.len(), 1);
        assert!(service
            .list_lodges(Some(park.id), Some(LodgeType::Luxury))
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn update_park_is_atomic() {
        let (service, _, park) = seeded_service().await;

        let bad = ParkUpdate {
            entry_fee_usd: Some(-5.0),
            ..ParkUpdate::default()
        };
        let result = service.update_park(park.id, bad).await;
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));

        let Ok(current) = service.get_park(park.id).await else {
            panic!("park missing");
        };
        assert!((current.entry_fee_usd - 70.0).abs() < f64::EPSILON);
    }
}
