pub mod session;
pub mod url_record;
