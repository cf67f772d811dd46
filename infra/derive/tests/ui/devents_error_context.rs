use devents_derive::devents_error;
use std::borrow::Cow;

#[devents_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<String, DemoError> {
    std::fs::read_to_string("/definitely/missing").context("Reading fixture")
}

fn main() {
    let err = read().unwrap_err();
    assert!(matches!(err, DemoError::Io { context: Some(_), .. }));
    assert_eq!(err.to_string().split(':').next(), Some("IO error (Reading fixture)"));

    let internal: DemoError = "boom".into();
    let internal: Result<(), DemoError> = Err(internal);
    let internal = internal.context("while testing").unwrap_err();
    assert_eq!(internal.to_string(), "Internal error (while testing): boom");
}
