use thiserror::Error;

/// Why a request was turned away without mutating anything. Each variant
/// maps to a stable notice code carried in the redirect query string; the
/// web layer owns the user-facing copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EndBeforeStart,
    BadTimeFormat,
    TitleRequired,
    DescriptionRequired,
    NonPositiveCapacity,
    VenueMissing,
    TypeMissing,
    OverVenueCapacity,
    VenueConflict,
    BelowCurrentParticipants,
    RegistrationClosed,
    ActivityFull,
    AlreadyJoined,
    NotJoined,
    EmptyComment,
    UsernameLength,
    InvalidEmail,
    PasswordLength,
    PasswordMismatch,
    DepartmentRequired,
    UsernameTaken,
    EmailTaken,
    BadCredentials,
    SelfRoleChange,
    BadRole,
    NameRequired,
    AddressRequired,
    NameTaken,
    VenueInUse,
    TypeInUse,
    ReviewDecided,
    BadDecision,
    NotExportableYet,
}

impl Rejection {
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::EndBeforeStart => "end_before_start",
            Rejection::BadTimeFormat => "bad_time",
            Rejection::TitleRequired => "title_required",
            Rejection::DescriptionRequired => "description_required",
            Rejection::NonPositiveCapacity => "bad_capacity",
            Rejection::VenueMissing => "venue_missing",
            Rejection::TypeMissing => "type_missing",
            Rejection::OverVenueCapacity => "over_capacity",
            Rejection::VenueConflict => "venue_conflict",
            Rejection::BelowCurrentParticipants => "below_current",
            Rejection::RegistrationClosed => "registration_closed",
            Rejection::ActivityFull => "activity_full",
            Rejection::AlreadyJoined => "already_joined",
            Rejection::NotJoined => "not_joined",
            Rejection::EmptyComment => "empty_comment",
            Rejection::UsernameLength => "username_length",
            Rejection::InvalidEmail => "invalid_email",
            Rejection::PasswordLength => "password_length",
            Rejection::PasswordMismatch => "password_mismatch",
            Rejection::DepartmentRequired => "department_required",
            Rejection::UsernameTaken => "username_taken",
            Rejection::EmailTaken => "email_taken",
            Rejection::BadCredentials => "bad_credentials",
            Rejection::SelfRoleChange => "self_role_change",
            Rejection::BadRole => "bad_role",
            Rejection::NameRequired => "name_required",
            Rejection::AddressRequired => "address_required",
            Rejection::NameTaken => "name_taken",
            Rejection::VenueInUse => "venue_in_use",
            Rejection::TypeInUse => "type_in_use",
            Rejection::ReviewDecided => "review_decided",
            Rejection::BadDecision => "bad_decision",
            Rejection::NotExportableYet => "not_exportable",
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("rejected: {}", .0.code())]
    Rejected(Rejection),
    #[error("not found")]
    NotFound,
    #[error("forbidden")]
    Forbidden,
    #[error("password hashing failed: {0}")]
    PasswordHash(argon2::password_hash::Error),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<Rejection> for ServiceError {
    fn from(r: Rejection) -> Self {
        ServiceError::Rejected(r)
    }
}

impl From<argon2::password_hash::Error> for ServiceError {
    fn from(e: argon2::password_hash::Error) -> Self {
        ServiceError::PasswordHash(e)
    }
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
