use std::borrow::Cow;

/// Errors surfaced by the subscription collaborators.
///
/// The resolver never retries or re-wraps these: a collaborator failure propagates to the
/// caller unchanged, except [`SubscriptionError::NoDatabase`], which setup treats as
/// "not ready".
#[devents_derive::devents_error]
pub enum SubscriptionError {
    /// The subscription store could not be queried or refreshed.
    #[error("Subscription store error{}: {message}", format_context(.context))]
    Store { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The resource directory lookup failed.
    #[error("Subscription resource error{}: {message}", format_context(.context))]
    Resource { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The package installer rejected or failed an install.
    #[error("Package installer error{}: {message}", format_context(.context))]
    Installer { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The backing database does not exist yet (fresh install, asset precompile, ...).
    #[error("Database does not exist{}: {message}", format_context(.context))]
    NoDatabase { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Any other database failure while probing the schema.
    #[error("Database error{}: {message}", format_context(.context))]
    Database { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal subscription error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
