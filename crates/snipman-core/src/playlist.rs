use serde::{Deserialize, Serialize};

/// One example snippet listed in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub id: String,
    pub name: String,
    /// Grouping key used when the catalog is displayed.
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Catalog of example snippets as published for a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub name: String,
    #[serde(default, alias = "snippets")]
    pub items: Vec<PlaylistItem>,
}

/// Items sharing a grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub items: Vec<PlaylistItem>,
}

/// A catalog regrouped for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gallery {
    pub name: String,
    pub groups: Vec<Group>,
}

impl Playlist {
    /// Group items by key. Groups appear in order of their first item; items
    /// keep their relative order.
    pub fn grouped(&self) -> Gallery {
        let mut groups: Vec<Group> = Vec::new();
        for item in &self.items {
            match groups.iter_mut().find(|g| g.name == item.group) {
                Some(group) => group.items.push(item.clone()),
                None => groups.push(Group {
                    name: item.group.clone(),
                    items: vec![item.clone()],
                }),
            }
        }
        Gallery {
            name: self.name.clone(),
            groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, group: &str) -> PlaylistItem {
        PlaylistItem {
            id: "abc".to_string(),
            name: name.to_string(),
            group: group.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_grouped_keeps_first_seen_order() {
        let playlist = Playlist {
            name: "Microsoft".to_string(),
            items: vec![
                item("Set range values", "Range Manipulation"),
                item("Set range values", "Tables"),
                item("Set formulas", "Range Manipulation"),
                item("Set background", "Tables"),
            ],
        };

        let gallery = playlist.grouped();
        assert_eq!(gallery.name, "Microsoft");
        assert_eq!(gallery.groups.len(), 2);
        assert_eq!(gallery.groups[0].name, "Range Manipulation");
        assert_eq!(gallery.groups[1].name, "Tables");

        let names: Vec<&str> = gallery.groups[0]
            .items
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, ["Set range values", "Set formulas"]);
    }

    #[test]
    fn test_empty_playlist() {
        let playlist = Playlist {
            name: "Empty".to_string(),
            items: Vec::new(),
        };
        assert!(playlist.grouped().groups.is_empty());
    }

    #[test]
    fn test_snippets_alias() {
        let json = r#"{
            "name": "Microsoft",
            "snippets": [{"id": "abc", "name": "Set formulas", "group": "Tables"}]
        }"#;
        let playlist: Playlist = serde_json::from_str(json).unwrap();
        assert_eq!(playlist.items.len(), 1);
        assert_eq!(playlist.items[0].group, "Tables");
    }
}
