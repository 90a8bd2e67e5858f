use sea_orm::entity::prelude::*;
use std::cmp::Ordering;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "shows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub start_time: TimeDateTime,
    pub artist_id: i32,
    pub venue_id: i32,
}

/// Temporal classification of a show relative to some instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tense {
    Past,
    Upcoming,
}

impl Model {
    /// A show starting exactly at `now` is neither past nor upcoming.
    pub fn tense(&self, now: TimeDateTime) -> Option<Tense> {
        match self.start_time.cmp(&now) {
            Ordering::Less => Some(Tense::Past),
            Ordering::Greater => Some(Tense::Upcoming),
            Ordering::Equal => None,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::artist::Entity",
        from = "Column::ArtistId",
        to = "super::artist::Column::Id"
    )]
    Artist,
    #[sea_orm(
        belongs_to = "super::venue::Entity",
        from = "Column::VenueId",
        to = "super::venue::Column::Id",
        on_delete = "Cascade"
    )]
    Venue,
}

impl Related<super::artist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artist.def()
    }
}

impl Related<super::venue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Venue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn show(start_time: TimeDateTime) -> Model {
        Model {
            id: 1,
            start_time,
            artist_id: 1,
            venue_id: 1,
        }
    }

    #[test]
    fn earlier_shows_are_past() {
        let now = datetime!(2023-06-10 20:00);
        assert_eq!(
            show(datetime!(2023-06-10 19:59:59)).tense(now),
            Some(Tense::Past)
        );
    }

    #[test]
    fn later_shows_are_upcoming() {
        let now = datetime!(2023-06-10 20:00);
        assert_eq!(
            show(datetime!(2023-06-11 0:00)).tense(now),
            Some(Tense::Upcoming)
        );
    }

    #[test]
    fn simultaneous_shows_are_neither() {
        let now = datetime!(2023-06-10 20:00);
        assert_eq!(show(now).tense(now), None);
    }
}
