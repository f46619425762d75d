// Library root: the league data model plus the two pure engines that work on
// it (fixture generation and standings computation).

pub mod model;
pub mod schedule;
pub mod standings;
