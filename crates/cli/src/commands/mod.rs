pub(crate) mod import_uprn;
pub(crate) mod serve;
