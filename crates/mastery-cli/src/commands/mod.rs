pub mod assess;
pub mod init;
pub mod levels;
pub mod record;
pub mod validate;
