mod approve;
mod compare;
mod init;
mod prune;
mod review;
mod test;
mod update;

pub use self::approve::approve;
pub use self::compare::compare;
pub use self::init::init;
pub use self::prune::prune;
pub use self::review::review;
pub use self::test::test;
pub use self::update::update;
