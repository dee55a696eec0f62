//! Form inputs and pickers

use super::{WidgetGenerator, WidgetHandler};
use crate::actions::{resolve_property, ActionCode};
use crate::context::{GeneratorContext, CONFIGURATION_SCREEN};
use crate::error::Result;
use crate::model::Widget;
use crate::properties::Properties;
use crate::utils::{escape_dart_string, indent};

pub fn handlers() -> Vec<Box<dyn WidgetHandler>> {
    vec![
        Box::new(TextFieldHandler),
        Box::new(DropdownHandler),
        Box::new(ToggleHandler),
        Box::new(SliderHandler),
        Box::new(PickerHandler),
    ]
}

/// `onChanged`-style callback with the given parameter list
fn change_callback(props: &Properties<'_>, name: &str, params: &str, ctx: &GeneratorContext<'_>) -> String {
    resolve_property(props, name, ctx)
        .unwrap_or_else(ActionCode::noop)
        .callback_with(params)
}

pub struct TextFieldHandler;

impl WidgetHandler for TextFieldHandler {
    fn name(&self) -> &'static str {
        "text_field"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "TextField"
    }

    fn generate(
        &self,
        widget: &Widget,
        _generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let props = Properties::new(widget, ctx.snapshot);
        let hint = escape_dart_string(&props.text_or("hintText", "Enter text..."));

        if widget.widget_id.as_deref() == Some("url_input") && ctx.on_screen(CONFIGURATION_SCREEN) {
            return Ok(format!(
                "TextField(
{ind}  controller: _urlController,
{ind}  decoration: InputDecoration(
{ind}    hintText: '{hint}',
{ind}    labelText: 'Server URL',
{ind}    prefixIcon: Icon(Icons.link),
{ind}    border: OutlineInputBorder(),
{ind}  ),
{ind})"
            ));
        }

        let mut code = format!("TextField(\n{ind}  decoration: InputDecoration(\n{ind}    hintText: '{hint}',");
        if let Some(label) = props.text("labelText") {
            code.push_str(&format!("\n{ind}    labelText: '{}',", escape_dart_string(&label)));
        }
        code.push_str(&format!("\n{ind}    border: OutlineInputBorder(),\n{ind}  ),"));

        if props.flag("obscureText", false) {
            code.push_str(&format!("\n{ind}  obscureText: true,"));
        }
        if let Some(max_lines) = props.truthy("maxLines") {
            code.push_str(&format!("\n{ind}  maxLines: {},", max_lines));
        }
        if let Some(keyboard) = props.truthy("keyboardType") {
            let member = match keyboard.trim_start_matches("TextInputType.") {
                "number" => "number",
                "email" | "emailAddress" => "emailAddress",
                "phone" => "phone",
                "url" => "url",
                "multiline" => "multiline",
                _ => "text",
            };
            code.push_str(&format!("\n{ind}  keyboardType: TextInputType.{},", member));
        }
        if props.contains("onChanged") {
            code.push_str(&format!(
                "\n{ind}  onChanged: {},",
                change_callback(&props, "onChanged", "value", ctx)
            ));
        }
        code.push_str(&format!("\n{ind})"));
        Ok(code)
    }
}

pub struct DropdownHandler;

impl WidgetHandler for DropdownHandler {
    fn name(&self) -> &'static str {
        "dropdown"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "DropdownButton"
    }

    fn generate(
        &self,
        widget: &Widget,
        _generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let props = Properties::new(widget, ctx.snapshot);

        let raw = props.text_or("items", "Option 1,Option 2,Option 3");
        let items: Vec<&str> = raw.split(',').map(str::trim).filter(|i| !i.is_empty()).collect();

        // A value outside the item list trips DropdownButton's assertion
        let value = props
            .text("value")
            .filter(|v| items.contains(&v.trim()))
            .map_or_else(|| "null".to_string(), |v| format!("'{}'", escape_dart_string(v.trim())));

        let mut code = format!("DropdownButton<String>(\n{ind}  value: {value},\n{ind}  items: [");
        for item in &items {
            let text = escape_dart_string(item);
            code.push_str(&format!(
                "\n{ind}    DropdownMenuItem(\n{ind}      value: '{text}',\n{ind}      child: Text('{text}'),\n{ind}    ),"
            ));
        }
        code.push_str(&format!(
            "\n{ind}  ],\n{ind}  onChanged: {},\n{ind})",
            change_callback(&props, "onChanged", "String? newValue", ctx)
        ));
        Ok(code)
    }
}

/// Switch, Checkbox and Radio
pub struct ToggleHandler;

impl ToggleHandler {
    fn switch(widget: &Widget, props: &Properties<'_>, indent_level: usize) -> String {
        let ind = indent(indent_level);
        let key = escape_dart_string(&props.text("widget_id").unwrap_or_else(|| widget.stable_id()));
        let initial = props.flag("value", false);
        format!(
            "Switch(
{ind}  value: _stateVariables['{key}'] ?? {initial},
{ind}  onChanged: (bool value) {{
{ind}    setState(() {{
{ind}      _stateVariables['{key}'] = value;
{ind}    }});
{ind}  }},
{ind})"
        )
    }
}

impl WidgetHandler for ToggleHandler {
    fn name(&self) -> &'static str {
        "toggle"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        matches!(widget_type, "Switch" | "Checkbox" | "Radio")
    }

    fn generate(
        &self,
        widget: &Widget,
        _generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let props = Properties::new(widget, ctx.snapshot);
        match widget.widget_type.as_str() {
            "Switch" => Ok(Self::switch(widget, &props, indent_level)),
            "Checkbox" => Ok(format!(
                "Checkbox(value: {}, onChanged: {})",
                props.flag("value", false),
                change_callback(&props, "onChanged", "bool? v", ctx)
            )),
            _ => Ok(format!(
                "Radio(value: '{}', groupValue: '{}', onChanged: {})",
                escape_dart_string(&props.text_or("value", "1")),
                escape_dart_string(&props.text_or("groupValue", "1")),
                change_callback(&props, "onChanged", "v", ctx)
            )),
        }
    }
}

pub struct SliderHandler;

impl WidgetHandler for SliderHandler {
    fn name(&self) -> &'static str {
        "slider"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        widget_type == "Slider"
    }

    fn generate(
        &self,
        widget: &Widget,
        _generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        _indent_level: usize,
    ) -> Result<String> {
        let props = Properties::new(widget, ctx.snapshot);
        let mut params = vec![
            format!("value: {}", props.text_or("value", "0.5")),
            format!("min: {}", props.text_or("min", "0.0")),
            format!("max: {}", props.text_or("max", "1.0")),
        ];
        if let Some(divisions) = props.truthy("divisions") {
            params.push(format!("divisions: {}", divisions));
        }
        params.push(format!("onChanged: {}", change_callback(&props, "onChanged", "double v", ctx)));
        Ok(format!("Slider({})", params.join(", ")))
    }
}

/// DatePicker, TimePicker and FileUpload buttons
pub struct PickerHandler;

impl WidgetHandler for PickerHandler {
    fn name(&self) -> &'static str {
        "picker"
    }

    fn can_handle(&self, widget_type: &str) -> bool {
        matches!(widget_type, "DatePicker" | "TimePicker" | "FileUpload")
    }

    fn generate(
        &self,
        widget: &Widget,
        _generator: &WidgetGenerator,
        ctx: &mut GeneratorContext<'_>,
        indent_level: usize,
    ) -> Result<String> {
        let ind = indent(indent_level);
        let props = Properties::new(widget, ctx.snapshot);

        let code = match widget.widget_type.as_str() {
            "DatePicker" => format!(
                "TextButton(
{ind}  onPressed: () async {{
{ind}    await showDatePicker(
{ind}      context: context,
{ind}      initialDate: DateTime.now(),
{ind}      firstDate: DateTime({first}),
{ind}      lastDate: DateTime({last}),
{ind}    );
{ind}  }},
{ind}  child: Text('{label}'),
{ind})",
                first = props.text_or("firstYear", "2020"),
                last = props.text_or("lastYear", "2030"),
                label = escape_dart_string(&props.text_or("text", "Select Date")),
            ),
            "TimePicker" => format!(
                "TextButton(
{ind}  onPressed: () async {{
{ind}    await showTimePicker(
{ind}      context: context,
{ind}      initialTime: TimeOfDay.now(),
{ind}    );
{ind}  }},
{ind}  child: Text('{label}'),
{ind})",
                label = escape_dart_string(&props.text_or("text", "Select Time")),
            ),
            _ => format!(
                "ElevatedButton.icon(
{ind}  onPressed: () async {{
{ind}    // File selection is wired up by the app
{ind}  }},
{ind}  icon: Icon(Icons.upload_file),
{ind}  label: Text('{label}'),
{ind})",
                label = escape_dart_string(&props.text_or("text", "Upload File")),
            ),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use crate::widgets::test_support::*;

    fn render(snapshot: &Snapshot, id: u64) -> String {
        let generator = WidgetGenerator::new();
        let mut ctx = GeneratorContext::new(snapshot);
        generator.generate_widget(snapshot.widget(id).unwrap(), &mut ctx, 0)
    }

    #[test]
    fn test_text_field() {
        let s = screen_with(&format!(
            r#"{{"id": 1, "widget_type": "TextField", "properties": [{}, {}, {}]}}"#,
            text_prop("hintText", "Email"),
            text_prop("labelText", "Your email"),
            r#"{"property_name": "obscureText", "property_type": "boolean", "boolean_value": true}"#,
        ));
        assert_eq!(
            render(&s, 1),
            "TextField(\n  decoration: InputDecoration(\n    hintText: 'Email',\n    labelText: 'Your email',\n    border: OutlineInputBorder(),\n  ),\n  obscureText: true,\n)"
        );
    }

    #[test]
    fn test_url_input_only_on_configuration_screen() {
        let json = r#"{"name": "T", "package_name": "com.example.t", "screens": [
            {"id": 1, "name": "Configuration", "route_name": "/configuration", "widgets": [
                {"id": 1, "widget_type": "TextField", "widget_id": "url_input"}
            ]},
            {"id": 2, "name": "Home", "route_name": "/home", "widgets": [
                {"id": 2, "widget_type": "TextField", "widget_id": "url_input"}
            ]}
        ]}"#;
        let s = Snapshot::from_json_str(json, "test").unwrap();
        let generator = WidgetGenerator::new();

        let mut ctx = GeneratorContext::new(&s);
        ctx.set_current_screen(s.screen(1));
        let code = generator.generate_widget(s.widget(1).unwrap(), &mut ctx, 0);
        assert!(code.contains("controller: _urlController,"));

        ctx.set_current_screen(s.screen(2));
        let code = generator.generate_widget(s.widget(2).unwrap(), &mut ctx, 0);
        assert!(!code.contains("_urlController"));
    }

    #[test]
    fn test_dropdown_value_must_be_an_item() {
        let s = screen_with(&format!(
            r#"{{"id": 1, "widget_type": "DropdownButton", "properties": [{}, {}]}},
               {{"id": 2, "widget_type": "DropdownButton", "properties": [{}, {}]}}"#,
            text_prop("items", "Red, ,Blue,"),
            text_prop("value", "Blue"),
            text_prop("items", "Red,Blue"),
            text_prop("value", "Green"),
        ));
        let first = render(&s, 1);
        assert!(first.contains("value: 'Blue',"));
        assert_eq!(first.matches("DropdownMenuItem(").count(), 2);
        assert!(first.contains("onChanged: (String? newValue) {},"));

        assert!(render(&s, 2).contains("value: null,"));
    }

    #[test]
    fn test_switch_uses_state_map() {
        let s = screen_with(
            r#"{"id": 1, "widget_type": "Switch", "widget_id": "notifications"},
               {"id": 2, "widget_type": "Switch"}"#,
        );
        let code = render(&s, 1);
        assert!(code.contains("value: _stateVariables['notifications'] ?? false,"));
        assert!(code.contains("_stateVariables['notifications'] = value;"));
        assert!(render(&s, 2).contains("_stateVariables['widget_2']"));
    }

    #[test]
    fn test_toggles_and_slider_never_null() {
        let s = screen_with(
            r#"{"id": 1, "widget_type": "Checkbox"},
               {"id": 2, "widget_type": "Radio"},
               {"id": 3, "widget_type": "Slider"}"#,
        );
        assert_eq!(render(&s, 1), "Checkbox(value: false, onChanged: (bool? v) {})");
        assert_eq!(render(&s, 2), "Radio(value: '1', groupValue: '1', onChanged: (v) {})");
        assert_eq!(
            render(&s, 3),
            "Slider(value: 0.5, min: 0.0, max: 1.0, onChanged: (double v) {})"
        );
    }

    #[test]
    fn test_checkbox_with_action() {
        let s = screen_with_extras(
            r#"{"id": 1, "widget_type": "Checkbox", "properties": [
                {"property_name": "onChanged", "property_type": "action_reference", "action_reference": 5}
            ]}"#,
            r#""actions": [{"id": 5, "name": "Back", "action_type": "navigate_back"}]"#,
        );
        assert_eq!(
            render(&s, 1),
            "Checkbox(value: false, onChanged: (bool? v) { Navigator.pop(context); })"
        );
    }

    #[test]
    fn test_pickers() {
        let s = screen_with(
            r#"{"id": 1, "widget_type": "DatePicker"},
               {"id": 2, "widget_type": "TimePicker"},
               {"id": 3, "widget_type": "FileUpload"}"#,
        );
        assert!(render(&s, 1).contains("showDatePicker("));
        assert!(render(&s, 2).contains("initialTime: TimeOfDay.now(),"));
        assert!(render(&s, 3).starts_with("ElevatedButton.icon("));
    }
}
