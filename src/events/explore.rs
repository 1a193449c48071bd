use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppError, AppResult, AppState,
    schema::{self, Event, Id, Organization, Skill},
    store::{Collection, DocumentStore, Filter, Store, fetch_many, fetch_one},
};

const UNKNOWN_ORGANIZATION: &str = "Unknown Organization";

/// An event as shown to volunteers browsing for something to join.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListing {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub organization: String,
    pub category: String,
    pub location: String,
    pub max_capacity: i64,
    pub current_joined: usize,
    pub required_skills: Vec<Skill>,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
}

/// Every event, soonest first.
pub async fn list_events(store: &dyn DocumentStore) -> AppResult<Vec<EventListing>> {
    let mut events = fetch_many::<Event>(store, Filter::All).await?;
    events.sort_by_key(|event| event.start_time);

    let mut listings = Vec::with_capacity(events.len());
    for event in events {
        listings.push(enrich(store, event).await?);
    }
    Ok(listings)
}

async fn enrich(store: &dyn DocumentStore, event: Event) -> AppResult<EventListing> {
    let organization = fetch_one::<Organization>(store, Filter::id("events", event.id)).await?;

    let (organization, category) = match organization {
        Some(org) => (organization_name(store, org.id).await?, org.category.to_string()),
        None => (UNKNOWN_ORGANIZATION.to_owned(), "General".to_owned()),
    };

    Ok(EventListing {
        id: event.id,
        name: event.name,
        description: event.description,
        organization,
        category,
        location: event.location,
        max_capacity: event.volunteer_cap,
        current_joined: event.joined_volunteers.len(),
        required_skills: event.required_skills,
        start_time: event.start_time,
        end_time: event.end_time,
    })
}

/// The part of an organization's owning account shown next to its events.
/// Owner accounts are not full user records, so nothing else is checked.
#[derive(Deserialize)]
struct OwnerName {
    #[serde(alias = "Name")]
    name: Option<String>,
    username: Option<String>,
}

async fn organization_name(store: &dyn DocumentStore, organization: Id) -> AppResult<String> {
    let Some(owner) = store.find_one(Collection::Users, Filter::id("data", organization)).await? else {
        return Ok(UNKNOWN_ORGANIZATION.to_owned());
    };

    let owner: OwnerName = schema::decode(&owner)?;
    Ok(owner.name.or(owner.username).unwrap_or_else(|| UNKNOWN_ORGANIZATION.to_owned()))
}

#[debug_handler(state = AppState)]
pub(crate) async fn events(State(store): State<Store>) -> AppResult<Json<Vec<EventListing>>> {
    Ok(Json(list_events(store.as_ref()).await?))
}

#[debug_handler(state = AppState)]
pub(crate) async fn event(
    Path(id): Path<String>,
    State(store): State<Store>,
) -> AppResult<Json<EventListing>> {
    let id: Id = id.parse()?;
    let Some(event) = fetch_one::<Event>(store.as_ref(), Filter::id("_id", id)).await? else {
        return Err(AppError::NotFound("Event not found"));
    };

    Ok(Json(enrich(store.as_ref(), event).await?))
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{DateTime, Document, doc};

    use super::*;
    use crate::store::InMemoryStore;

    fn event(id: Id, name: &str, start: i64, joined: Vec<Id>) -> Document {
        doc! {
            "_id": id,
            "name": name,
            "description": "",
            "volunteerCap": 10,
            "location": "Town hall",
            "requiredSkills": "organization",
            "startTime": DateTime::from_millis(start),
            "endTime": DateTime::from_millis(start + 3_600_000),
            "joinedVolunteers": joined,
        }
    }

    #[tokio::test]
    async fn soonest_first_with_owner() {
        let (late, early, org) = (Id::new(), Id::new(), Id::new());
        let store = InMemoryStore::new()
            .with(
                Collection::Events,
                [event(late, "Late", 2_000_000, vec![]), event(early, "Early", 1_000_000, vec![Id::new(), Id::new()])],
            )
            .with(Collection::Organizations, [doc! { "_id": org, "category": "NGO", "events": [early] }])
            .with(
                Collection::Users,
                [doc! { "_id": Id::new(), "username": "greenhands", "email": "o@example.com", "civicId": "c", "data": org }],
            );

        let listings = list_events(&store).await.unwrap();
        let names: Vec<_> = listings.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Early", "Late"]);

        assert_eq!(listings[0].organization, "greenhands");
        assert_eq!(listings[0].category, "NGO");
        assert_eq!(listings[0].current_joined, 2);

        assert_eq!(listings[1].organization, UNKNOWN_ORGANIZATION);
        assert_eq!(listings[1].category, "General");
    }

    #[tokio::test]
    async fn organization_without_owner_account() {
        let (id, org) = (Id::new(), Id::new());
        let store = InMemoryStore::new()
            .with(Collection::Events, [event(id, "Solo", 0, vec![])])
            .with(Collection::Organizations, [doc! { "_id": org, "category": "School", "events": [id] }]);

        let listings = list_events(&store).await.unwrap();
        assert_eq!(listings[0].organization, UNKNOWN_ORGANIZATION);
        assert_eq!(listings[0].category, "School");
    }

    #[tokio::test]
    async fn organization_linked_by_string_ids() {
        let (id, org) = (Id::new(), Id::new());
        let store = InMemoryStore::new()
            .with(Collection::Events, [event(id, "Stringly", 0, vec![])])
            .with(Collection::Organizations, [doc! { "_id": org, "category": "Company", "events": [id.to_string()] }])
            .with(Collection::Users, [doc! { "_id": Id::new(), "Name": "Acme", "data": org.to_string() }]);

        let listings = list_events(&store).await.unwrap();
        assert_eq!(listings[0].organization, "Acme");
        assert_eq!(listings[0].category, "Company");
    }

    #[tokio::test]
    async fn malformed_event_fails_the_listing() {
        let store = InMemoryStore::new().with(Collection::Events, [doc! { "_id": Id::new(), "name": "Half" }]);
        assert!(matches!(list_events(&store).await, Err(AppError::Validation { field }) if field == "description"));
    }
}
