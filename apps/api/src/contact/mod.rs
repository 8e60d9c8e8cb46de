// Contact form relay: validation, recipient resolution and email delivery.

pub mod handlers;
pub mod mailer;
pub mod relay;
