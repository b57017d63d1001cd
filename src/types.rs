/// Reference point inside an item used to express a view position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    /// The leading edge of the item.
    #[default]
    Start,
    /// The middle of the item, or of the view when the item is larger than the view.
    Center,
    /// The trailing edge of the item.
    End,
}

impl Alignment {
    /// Parses `"start"`, `"center"` or `"end"`; anything else maps to [`Alignment::Start`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "center" => Self::Center,
            "end" => Self::End,
            _ => Self::Start,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
        }
    }
}

/// Geometry of a single item along the tracked axis.
///
/// For an index past the end of the sequence the tracker reports a zero-sized,
/// measured sentinel located at the total size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStats {
    pub start: f64,
    pub size: f64,
    pub end: f64,
    pub is_measured: bool,
}

impl ItemStats {
    pub(crate) fn sentinel(offset: f64) -> Self {
        Self {
            start: offset,
            size: 0.0,
            end: offset,
            is_measured: true,
        }
    }

    /// Returns `true` if `offset` lies in `[start, end)`.
    pub fn contains(&self, offset: f64) -> bool {
        self.start <= offset && offset < self.end
    }
}
