pub mod ask;
pub mod history;
pub mod options;
pub mod recommend;
pub mod venues;
