//! Text forms - field values, focus, cursor and inline errors

use crate::error::{Field, ValidationErrors};

#[derive(Clone, Debug)]
pub struct FormField {
    pub field: Field,
    pub label: &'static str,
    pub value: String,
    /// Rendered masked (passwords)
    pub secret: bool,
    pub error: Option<String>,
}

impl FormField {
    pub fn new(field: Field, label: &'static str) -> Self {
        FormField {
            field,
            label,
            value: String::new(),
            secret: false,
            error: None,
        }
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }
}

#[derive(Clone, Debug)]
pub struct Form {
    pub fields: Vec<FormField>,
    pub focused: usize,
    pub cursor_position: usize,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        Form {
            fields,
            focused: 0,
            cursor_position: 0,
        }
    }

    pub fn login() -> Self {
        Form::new(vec![
            FormField::new(Field::Email, "Email"),
            FormField::new(Field::Password, "Password").secret(),
        ])
    }

    pub fn task() -> Self {
        Form::new(vec![
            FormField::new(Field::Title, "Title"),
            FormField::new(Field::Description, "Description"),
        ])
    }

    pub fn employee() -> Self {
        Form::new(vec![
            FormField::new(Field::Name, "Name"),
            FormField::new(Field::Email, "Email"),
            FormField::new(Field::Password, "Password").secret(),
        ])
    }

    pub fn profile() -> Self {
        Form::new(vec![
            FormField::new(Field::Username, "Username"),
            FormField::new(Field::ImagePath, "Image file"),
        ])
    }

    pub fn value(&self, field: Field) -> &str {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    pub fn set_value(&mut self, field: Field, value: impl Into<String>) {
        if let Some(f) = self.fields.iter_mut().find(|f| f.field == field) {
            f.value = value.into();
        }
        self.cursor_position = self.current_input().len();
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .and_then(|f| f.error.as_deref())
    }

    pub fn set_error(&mut self, field: Field, message: Option<&str>) {
        if let Some(f) = self.fields.iter_mut().find(|f| f.field == field) {
            f.error = message.map(str::to_string);
        }
    }

    pub fn focused_field(&self) -> Option<Field> {
        self.fields.get(self.focused).map(|f| f.field)
    }

    pub fn clear_errors(&mut self) {
        for f in &mut self.fields {
            f.error = None;
        }
    }

    /// Attach each validation message to its field
    pub fn apply_errors(&mut self, errors: &ValidationErrors) {
        self.clear_errors();
        for (field, message) in errors.iter() {
            self.set_error(field, Some(message));
        }
    }

    pub fn clear(&mut self) {
        for f in &mut self.fields {
            f.value.clear();
            f.error = None;
        }
        self.focused = 0;
        self.cursor_position = 0;
    }

    // ========================
    // Focus
    // ========================

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
            self.cursor_position = self.current_input().len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = self.focused.checked_sub(1).unwrap_or(self.fields.len() - 1);
            self.cursor_position = self.current_input().len();
        }
    }

    // ========================
    // Input editing
    // ========================

    pub fn current_input(&self) -> &str {
        self.fields
            .get(self.focused)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            self.cursor_position = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            self.cursor_position = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        if let Some(f) = self.fields.get_mut(self.focused) {
            if cursor_pos <= f.value.len() {
                f.value.insert(cursor_pos, c);
                self.cursor_position = cursor_pos + c.len_utf8();
            }
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let cursor_pos = self.cursor_position;
        if let Some(f) = self.fields.get_mut(self.focused) {
            let prev_pos = f.value[..cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            f.value.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_and_backspace_respect_utf8() {
        let mut form = Form::task();
        for c in "café".chars() {
            form.enter_char(c);
        }
        assert_eq!(form.value(Field::Title), "café");

        form.delete_char();
        assert_eq!(form.value(Field::Title), "caf");

        form.move_cursor_left();
        form.enter_char('X');
        assert_eq!(form.value(Field::Title), "caXf");
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = Form::login();
        form.prev_field();
        assert_eq!(form.focused_field(), Some(Field::Password));
        form.next_field();
        assert_eq!(form.focused_field(), Some(Field::Email));
    }

    #[test]
    fn test_errors_attach_to_fields() {
        let mut form = Form::task();
        let mut errors = ValidationErrors::new();
        errors.add(Field::Description, "description should not be empty");
        form.apply_errors(&errors);

        assert_eq!(form.error(Field::Description), Some("description should not be empty"));
        assert_eq!(form.error(Field::Title), None);
        form.clear();
        assert_eq!(form.error(Field::Description), None);
    }
}
