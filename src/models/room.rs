use serde::{Deserialize, Serialize};

/// The property has exactly two bookable rooms. Room identity on the
/// authoritative calendar is carried only by a keyword in the event label
/// ("west" / "east"), so both the decode and the labels we write go through
/// this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Room {
    West,
    East,
}

/// Guests a single room sleeps.
pub const ROOM_CAPACITY: u32 = 2;

impl Room {
    pub fn id(self) -> u8 {
        match self {
            Room::West => 1,
            Room::East => 2,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Room::West => "West Room",
            Room::East => "East Room",
        }
    }

    /// The keyword token that attributes a calendar interval to this room.
    pub fn keyword(self) -> &'static str {
        match self {
            Room::West => "west",
            Room::East => "east",
        }
    }

    pub fn other(self) -> Room {
        match self {
            Room::West => Room::East,
            Room::East => Room::West,
        }
    }
}

/// The room-id-set a guest can request: one room or both. "Both" is a
/// selection over the two rooms, not a third room entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomSelection {
    West,
    East,
    Both,
}

impl RoomSelection {
    pub fn rooms(self) -> &'static [Room] {
        match self {
            RoomSelection::West => &[Room::West],
            RoomSelection::East => &[Room::East],
            RoomSelection::Both => &[Room::West, Room::East],
        }
    }

    pub fn room_count(self) -> u32 {
        self.rooms().len() as u32
    }

    pub fn capacity(self) -> u32 {
        self.room_count() * ROOM_CAPACITY
    }

    /// Wire form used by guests: a list of room ids, `[1]`, `[2]` or `[1,2]`.
    pub fn from_ids(ids: &[u8]) -> Option<RoomSelection> {
        let mut west = false;
        let mut east = false;
        for id in ids {
            match id {
                1 => west = true,
                2 => east = true,
                _ => return None,
            }
        }
        match (west, east) {
            (true, true) => Some(RoomSelection::Both),
            (true, false) => Some(RoomSelection::West),
            (false, true) => Some(RoomSelection::East),
            (false, false) => None,
        }
    }

    /// Decodes room attribution from a free-text calendar label by keyword
    /// presence, case-insensitive. A label carrying neither token is not
    /// attributable to any room and yields `None`; callers are expected to
    /// skip such intervals (and say so in the log).
    pub fn from_label(label: &str) -> Option<RoomSelection> {
        let label = label.to_lowercase();
        let west = label.contains(Room::West.keyword());
        let east = label.contains(Room::East.keyword());
        match (west, east) {
            (true, true) => Some(RoomSelection::Both),
            (true, false) => Some(RoomSelection::West),
            (false, true) => Some(RoomSelection::East),
            (false, false) => None,
        }
    }

    pub fn display_names(self) -> String {
        let names: Vec<&str> = self.rooms().iter().map(|r| r.display_name()).collect();
        names.join(", ")
    }

    /// Storage form, one of `west` / `east` / `both`.
    pub fn as_str(self) -> &'static str {
        match self {
            RoomSelection::West => "west",
            RoomSelection::East => "east",
            RoomSelection::Both => "both",
        }
    }

    pub fn parse(s: &str) -> Option<RoomSelection> {
        match s {
            "west" => Some(RoomSelection::West),
            "east" => Some(RoomSelection::East),
            "both" => Some(RoomSelection::Both),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_attribution_by_keyword() {
        assert_eq!(
            RoomSelection::from_label("West Room - Kim family"),
            Some(RoomSelection::West)
        );
        assert_eq!(
            RoomSelection::from_label("EAST room maintenance"),
            Some(RoomSelection::East)
        );
        assert_eq!(
            RoomSelection::from_label("[Booked] West Room, East Room - J. Park"),
            Some(RoomSelection::Both)
        );
        // No recognizable token: not attributable.
        assert_eq!(RoomSelection::from_label("Staff meeting"), None);
        assert_eq!(RoomSelection::from_label(""), None);
    }

    #[test]
    fn selection_from_ids() {
        assert_eq!(RoomSelection::from_ids(&[1]), Some(RoomSelection::West));
        assert_eq!(RoomSelection::from_ids(&[2]), Some(RoomSelection::East));
        assert_eq!(RoomSelection::from_ids(&[1, 2]), Some(RoomSelection::Both));
        assert_eq!(RoomSelection::from_ids(&[2, 1]), Some(RoomSelection::Both));
        assert_eq!(RoomSelection::from_ids(&[]), None);
        assert_eq!(RoomSelection::from_ids(&[3]), None);
    }

    #[test]
    fn capacity_follows_room_count() {
        assert_eq!(RoomSelection::West.capacity(), 2);
        assert_eq!(RoomSelection::East.capacity(), 2);
        assert_eq!(RoomSelection::Both.capacity(), 4);
    }

    #[test]
    fn display_names_carry_the_keyword_tokens() {
        for sel in [RoomSelection::West, RoomSelection::East, RoomSelection::Both] {
            assert_eq!(RoomSelection::from_label(&sel.display_names()), Some(sel));
        }
    }
}
