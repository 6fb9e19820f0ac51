mod ids;
mod track;
mod user;

pub use ids::TrackId;
pub use track::Track;
pub use user::UserProfile;
