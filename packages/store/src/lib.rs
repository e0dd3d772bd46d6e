pub mod contract;
pub mod feed;
pub mod models;

mod memory;
pub use memory::{MemoryStore, Operation};

pub use contract::{AuthError, RecordStore, SessionStore, SignUp, StoreError};
pub use feed::{ChangeFeed, SessionChange, SessionChanges};
pub use models::{
    AuthEvent, BaselineProfile, Collection, Gender, InjuryAssessment, Language, LanguageGroup,
    Profile, Row, Session, User,
};
