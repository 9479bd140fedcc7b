mod email;

pub use email::{
    EmailMessage, IEmailSender, LoggingEmailSender, RecordingEmailSender, SmtpEmailSender,
};
