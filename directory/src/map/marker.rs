/// Visual state of a pin on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerStyle {
    Default,
    Selected,
    /// An unconfirmed map pick.
    Candidate,
}

/// Everything a widget needs to draw a pin.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerIcon {
    pub url: String,
    pub size: (f64, f64),
    pub anchor: (f64, f64),
    pub z_index: i32,
}

const GOOGLE_BLUE: &str = "%234285F4";
const GOOGLE_RED: &str = "%23EA4335";

impl MarkerStyle {
    pub fn color(self) -> &'static str {
        match self {
            Self::Selected => "#4285F4",
            Self::Default | Self::Candidate => "#EA4335",
        }
    }

    pub fn scale(self) -> f64 {
        match self {
            Self::Selected => 1.25,
            Self::Default | Self::Candidate => 1.0,
        }
    }

    pub fn z_index(self) -> i32 {
        match self {
            Self::Selected => 1000,
            Self::Default => 1,
            Self::Candidate => 0,
        }
    }

    pub fn icon(self) -> MarkerIcon {
        let side = 40.0 * self.scale();
        MarkerIcon {
            url: self.svg_data_url(),
            size: (side, side),
            anchor: (side / 2.0, side),
            z_index: self.z_index(),
        }
    }

    fn svg_data_url(self) -> String {
        match self {
            Self::Default | Self::Selected => {
                let fill = if self == Self::Selected { GOOGLE_BLUE } else { GOOGLE_RED };
                format!(
                    "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'%3E%3Cpath fill='{}' stroke='%23ffffff' stroke-width='1.5' d='M12 0C7.58 0 4 3.58 4 8c0 5.25 7 13 7 13s7-7.75 7-13c0-4.42-3.58-8-8-8z'/%3E%3Ccircle cx='12' cy='8' r='3' fill='%23ffffff'/%3E%3C/svg%3E",
                    fill
                )
            }
            Self::Candidate => format!(
                "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'%3E%3Cpath fill='{}' stroke='rgba(0,0,0,0.2)' stroke-width='1' d='M12 2C8.13 2 5 5.13 5 9c0 5.25 7 13 7 13s7-7.75 7-13c0-3.87-3.13-7-7-7z'/%3E%3Ccircle cx='12' cy='9' r='2.5' fill='%23ffffff'/%3E%3C/svg%3E",
                GOOGLE_RED
            ),
        }
    }
}
