//! Application snapshot data model
//!
//! The generator reads a JSON document describing one application: its theme,
//! screens, widget records, actions and data sources. Property records arrive
//! in a one-slot-per-type layout and are folded into [`PropertyValue`] while
//! deserializing, so downstream code only ever sees a single typed value.

use serde::Deserialize;

pub type ScreenId = u64;
pub type WidgetId = u64;
pub type ActionId = u64;
pub type DataSourceId = u64;
pub type FieldId = u64;

#[derive(Debug, Clone, Deserialize)]
pub struct Application {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    pub package_name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub screens: Vec<Screen>,
    #[serde(default)]
    pub data_sources: Vec<DataSource>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub custom_widgets: Vec<CustomPubDevWidget>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub name: String,
    pub primary_color: String,
    pub accent_color: String,
    pub background_color: String,
    pub text_color: String,
    pub font_family: String,
    pub is_dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            primary_color: "#2196F3".to_string(),
            accent_color: "#FF4081".to_string(),
            background_color: "#FFFFFF".to_string(),
            text_color: "#000000".to_string(),
            font_family: "Roboto".to_string(),
            is_dark_mode: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Screen {
    pub id: ScreenId,
    pub name: String,
    pub route_name: String,
    #[serde(default)]
    pub is_home_screen: bool,
    #[serde(default)]
    pub app_bar_title: Option<String>,
    #[serde(default = "default_true")]
    pub show_app_bar: bool,
    #[serde(default = "default_true")]
    pub show_back_button: bool,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct Widget {
    pub id: WidgetId,
    pub widget_type: String,
    #[serde(default)]
    pub parent: Option<WidgetId>,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub widget_id: Option<String>,
    #[serde(default)]
    pub properties: Vec<WidgetProperty>,
}

impl Widget {
    /// Developer-assigned identifier, or a stable one derived from the record id
    pub fn stable_id(&self) -> String {
        match self.widget_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("widget_{}", self.id),
        }
    }
}

/// A single named property of a widget
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawProperty")]
pub struct WidgetProperty {
    pub name: String,
    pub value: PropertyValue,
}

/// Typed property value. `Unset` covers a missing slot for the declared type
/// and property types the generator never reads.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    Color(String),
    Alignment(String),
    Url(String),
    Json(serde_json::Value),
    Action(ActionId),
    DataField(FieldId),
    Screen(ScreenId),
    Unset,
}

impl PropertyValue {
    /// Absent values make accessors fall back to their defaults
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Unset => true,
            Self::Text(s) | Self::Color(s) | Self::Alignment(s) | Self::Url(s) => s.is_empty(),
            Self::Json(serde_json::Value::Null) => true,
            Self::Json(serde_json::Value::String(s)) => s.is_empty(),
            _ => false,
        }
    }

    /// Falsy values (zero, false, empty) are skipped by optional parameters
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Integer(n) => *n != 0,
            Self::Decimal(n) => *n != 0.0,
            Self::Boolean(b) => *b,
            other => !other.is_absent(),
        }
    }

    /// Source-level text of a scalar value. References have no text form.
    pub fn display(&self) -> Option<String> {
        match self {
            Self::Text(s) | Self::Color(s) | Self::Alignment(s) | Self::Url(s) => Some(s.clone()),
            Self::Integer(n) => Some(n.to_string()),
            Self::Decimal(n) => Some(format_decimal(*n)),
            Self::Boolean(b) => Some(b.to_string()),
            Self::Json(serde_json::Value::String(s)) => Some(s.clone()),
            Self::Json(v) => Some(v.to_string()),
            Self::Action(_) | Self::DataField(_) | Self::Screen(_) | Self::Unset => None,
        }
    }
}

/// Decimals always carry a fractional part so Dart reads them as doubles
pub fn format_decimal(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}

#[derive(Debug, Deserialize)]
struct RawProperty {
    property_name: String,
    #[serde(default = "default_property_type")]
    property_type: String,
    #[serde(default)]
    string_value: Option<String>,
    #[serde(default)]
    integer_value: Option<i64>,
    #[serde(default)]
    decimal_value: Option<f64>,
    #[serde(default)]
    boolean_value: Option<bool>,
    #[serde(default)]
    color_value: Option<String>,
    #[serde(default)]
    alignment_value: Option<String>,
    #[serde(default)]
    url_value: Option<String>,
    #[serde(default)]
    json_value: Option<serde_json::Value>,
    #[serde(default)]
    action_reference: Option<ActionId>,
    #[serde(default)]
    data_source_field_reference: Option<FieldId>,
    #[serde(default)]
    screen_reference: Option<ScreenId>,
}

fn default_property_type() -> String {
    "string".to_string()
}

impl From<RawProperty> for WidgetProperty {
    fn from(raw: RawProperty) -> Self {
        let value = match raw.property_type.as_str() {
            "string" => raw.string_value.map(PropertyValue::Text),
            "integer" => raw.integer_value.map(PropertyValue::Integer),
            "decimal" => raw.decimal_value.map(PropertyValue::Decimal),
            "boolean" => raw.boolean_value.map(PropertyValue::Boolean),
            "color" => raw.color_value.map(PropertyValue::Color),
            "alignment" => raw.alignment_value.map(PropertyValue::Alignment),
            "url" => raw.url_value.map(PropertyValue::Url),
            "json" => raw.json_value.map(PropertyValue::Json),
            "action_reference" => raw.action_reference.map(PropertyValue::Action),
            "data_source_field_reference" => {
                raw.data_source_field_reference.map(PropertyValue::DataField)
            }
            "screen_reference" => raw.screen_reference.map(PropertyValue::Screen),
            other => {
                log::debug!(
                    "Property '{}' has unreadable type '{}'",
                    raw.property_name,
                    other
                );
                None
            }
        };

        WidgetProperty {
            name: raw.property_name,
            value: value.unwrap_or(PropertyValue::Unset),
        }
    }
}

/// Behaviour attached to interactive widgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionType {
    Navigate,
    NavigateBack,
    ApiCall,
    ShowDialog,
    ShowSnackbar,
    OpenUrl,
    SendEmail,
    MakePhoneCall,
    ShareContent,
    TakePhoto,
    PickImage,
    SaveData,
    LoadData,
    RefreshData,
    SubmitForm,
    ValidateForm,
    ClearForm,
    ToggleVisibility,
    PlaySound,
    Vibrate,
    Other(String),
}

impl ActionType {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "navigate" => Self::Navigate,
            "navigate_back" => Self::NavigateBack,
            "api_call" => Self::ApiCall,
            "show_dialog" => Self::ShowDialog,
            "show_snackbar" => Self::ShowSnackbar,
            "open_url" => Self::OpenUrl,
            "send_email" => Self::SendEmail,
            "make_phone_call" => Self::MakePhoneCall,
            "share_content" => Self::ShareContent,
            "take_photo" => Self::TakePhoto,
            "pick_image" => Self::PickImage,
            "save_data" => Self::SaveData,
            "load_data" => Self::LoadData,
            "refresh_data" => Self::RefreshData,
            "submit_form" => Self::SubmitForm,
            "validate_form" => Self::ValidateForm,
            "clear_form" => Self::ClearForm,
            "toggle_visibility" => Self::ToggleVisibility,
            "play_sound" => Self::PlaySound,
            "vibrate" => Self::Vibrate,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Action {
    pub id: ActionId,
    pub name: String,
    pub action_type: String,
    #[serde(default)]
    pub target_screen: Option<ScreenId>,
    #[serde(default)]
    pub api_data_source: Option<DataSourceId>,
    /// JSON object, or a string holding one
    #[serde(default)]
    pub parameters: Option<serde_json::Value>,
    #[serde(default)]
    pub dialog_title: Option<String>,
    #[serde(default)]
    pub dialog_message: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Action {
    pub fn kind(&self) -> ActionType {
        ActionType::parse(&self.action_type)
    }

    /// Parameters as a JSON object; malformed input yields `None`
    pub fn parameter_map(&self) -> Option<serde_json::Map<String, serde_json::Value>> {
        let value = match self.parameters.as_ref()? {
            serde_json::Value::String(s) => serde_json::from_str(s).ok()?,
            other => other.clone(),
        };
        match value {
            serde_json::Value::Object(map) => Some(map),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSource {
    pub id: DataSourceId,
    pub name: String,
    #[serde(default = "default_source_type")]
    pub data_source_type: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default = "default_method")]
    pub method: String,
    /// Newline-separated `Key: Value` pairs
    #[serde(default)]
    pub headers: Option<String>,
    #[serde(default)]
    pub use_dynamic_base_url: bool,
    #[serde(default)]
    pub fields: Vec<DataSourceField>,
}

fn default_source_type() -> String {
    "REST_API".to_string()
}

fn default_method() -> String {
    "GET".to_string()
}

impl DataSource {
    pub fn header_pairs(&self) -> Vec<(String, String)> {
        self.headers
            .as_deref()
            .unwrap_or("")
            .lines()
            .filter_map(|line| {
                let (key, value) = line.split_once(':')?;
                Some((key.trim().to_string(), value.trim().to_string()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSourceField {
    pub id: FieldId,
    pub field_name: String,
    #[serde(default = "default_field_type")]
    pub field_type: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub is_required: bool,
}

fn default_field_type() -> String {
    "string".to_string()
}

/// Third-party pub.dev package registered for use in `Custom_*` widgets
#[derive(Debug, Clone, Deserialize)]
pub struct CustomPubDevWidget {
    pub package_name: String,
    #[serde(default)]
    pub package_version: String,
    #[serde(default)]
    pub widget_class_name: String,
    #[serde(default)]
    pub import_statement: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}
