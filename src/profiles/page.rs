use axum::{Json, debug_handler, extract::State};
use serde::Serialize;
use time::OffsetDateTime;
use tower_sessions::Session;

use crate::{
    AppError, AppResult, AppState,
    schema::{Badge, Skill, User, UserType, Volunteer},
    session::{self, AuthUser},
    store::{DocumentStore, Filter, Store, fetch_many, fetch_one},
};

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub name: Option<String>,
    pub email: String,
    pub username: Option<String>,
    pub bio: Option<String>,
    #[serde(rename = "type")]
    pub user_type: Option<UserType>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    pub skills: Vec<Skill>,
    pub badges: Vec<Badge>,
}

/// The volunteer profile behind the logged in identity.
pub async fn load_profile(store: &dyn DocumentStore, auth: &AuthUser) -> AppResult<ProfileView> {
    let by_identity = Filter::or([
        Filter::eq("civicId", auth.id.as_str()),
        Filter::eq("oidcId", auth.id.as_str()),
    ]);
    let Some(user) = fetch_one::<User>(store, by_identity).await? else {
        return Err(AppError::UserNotFound);
    };

    if user.email != auth.email {
        return Err(AppError::Forbidden("Email mismatch"));
    }

    let volunteer = match user.data {
        Some(data) => fetch_one::<Volunteer>(store, Filter::id("_id", data)).await?,
        None => None,
    };
    let Some(volunteer) = volunteer else {
        return Err(AppError::NotFound("User data not found"));
    };

    let badges = if volunteer.badges.is_empty() {
        Vec::new()
    } else {
        let ids = volunteer.badges.iter().map(|id| Filter::id("_id", *id));
        fetch_many::<Badge>(store, Filter::or(ids)).await?
    };

    Ok(ProfileView {
        name: user.name,
        email: user.email,
        username: user.username,
        bio: user.bio,
        user_type: user.user_type,
        created_at: user.created_at,
        skills: volunteer.skills,
        badges,
    })
}

#[debug_handler(state = AppState)]
pub(crate) async fn profile(
    State(store): State<Store>,
    session: Session,
) -> AppResult<Json<ProfileView>> {
    let Some(auth) = session::current_user(&session).await? else {
        return Err(AppError::Unauthenticated);
    };

    Ok(Json(load_profile(store.as_ref(), &auth).await?))
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{Document, doc};

    use super::*;
    use crate::{
        schema::Id,
        store::{Collection, InMemoryStore},
    };

    fn auth() -> AuthUser {
        AuthUser {
            id: "civic-alice".to_owned(),
            email: "alice@example.com".to_owned(),
        }
    }

    fn alice(data: Option<Id>) -> Document {
        let mut doc = doc! {
            "_id": Id::new(),
            "name": "Alice",
            "username": "alice123",
            "email": "alice@example.com",
            "civicId": "civic-alice",
            "type": "volunteer",
        };
        if let Some(data) = data {
            doc.insert("data", data);
        }
        doc
    }

    #[tokio::test]
    async fn full_profile_with_badges() {
        let (volunteer, first_aid, helper, unowned) = (Id::new(), Id::new(), Id::new(), Id::new());
        let badge = |id: Id, name: &str| doc! { "_id": id, "name": name, "description": "", "url": "https://badges.example/x.png" };
        let store = InMemoryStore::new()
            .with(Collection::Users, [alice(Some(volunteer))])
            .with(Collection::Volunteers, [doc! { "_id": volunteer, "skills": "first aid,teamwork", "badges": [first_aid, helper] }])
            .with(Collection::Badges, [badge(first_aid, "First aider"), badge(unowned, "Stranger"), badge(helper, "Helper")]);

        let profile = load_profile(&store, &auth()).await.unwrap();
        assert_eq!(profile.username.as_deref(), Some("alice123"));
        assert_eq!(profile.skills, vec![Skill::FirstAid, Skill::Teamwork]);
        let names: Vec<_> = profile.badges.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["First aider", "Helper"]);
    }

    #[tokio::test]
    async fn unknown_identity() {
        let store = InMemoryStore::new();
        assert!(matches!(load_profile(&store, &auth()).await, Err(AppError::UserNotFound)));
    }

    #[tokio::test]
    async fn email_must_match() {
        let store = InMemoryStore::new().with(Collection::Users, [alice(None)]);
        let imposter = AuthUser { email: "mallory@example.com".to_owned(), ..auth() };
        assert!(matches!(load_profile(&store, &imposter).await, Err(AppError::Forbidden("Email mismatch"))));
    }

    #[tokio::test]
    async fn missing_volunteer_data() {
        let store = InMemoryStore::new().with(Collection::Users, [alice(None)]);
        assert!(matches!(load_profile(&store, &auth()).await, Err(AppError::NotFound("User data not found"))));

        let store = InMemoryStore::new().with(Collection::Users, [alice(Some(Id::new()))]);
        assert!(matches!(load_profile(&store, &auth()).await, Err(AppError::NotFound(_))));
    }
}
