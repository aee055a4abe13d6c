use chrono::{Datelike, Months, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

impl DatePart {
    fn width(self) -> usize {
        match self {
            DatePart::Year => 4,
            DatePart::Month | DatePart::Day => 2,
        }
    }
}

/// Date field edited one part at a time: type digits, or step with Up/Down.
#[derive(Clone, Debug)]
pub struct DateInputState {
    pub date: NaiveDate,
    pub date_part: DatePart,
    typed: String,
}

impl DateInputState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            date_part: DatePart::Year,
            typed: String::new(),
        }
    }

    pub fn begin_editing(&mut self) {
        self.date_part = DatePart::Year;
        self.typed.clear();
    }

    pub fn next_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Month,
            DatePart::Month => DatePart::Day,
            DatePart::Day => DatePart::Year,
        };
        self.typed.clear();
    }

    pub fn previous_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Day,
            DatePart::Month => DatePart::Year,
            DatePart::Day => DatePart::Month,
        };
        self.typed.clear();
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.typed.push(c);
                if self.typed.len() == self.date_part.width() {
                    self.commit_typed();
                    self.next_date_part();
                }
            }
            KeyCode::Backspace => {
                self.typed.pop();
            }
            KeyCode::Up => self.step(1),
            KeyCode::Down => self.step(-1),
            KeyCode::Right | KeyCode::Tab => self.next_date_part(),
            KeyCode::Left | KeyCode::BackTab => self.previous_date_part(),
            _ => {}
        }
    }

    fn commit_typed(&mut self) {
        let Ok(value) = self.typed.parse::<u32>() else {
            return;
        };
        let (year, month, day) = (self.date.year(), self.date.month(), self.date.day());
        let candidate = match self.date_part {
            DatePart::Year if (1900..=2100).contains(&value) => {
                clamped_date(value as i32, month, day)
            }
            DatePart::Month if (1..=12).contains(&value) => clamped_date(year, value, day),
            DatePart::Day => NaiveDate::from_ymd_opt(year, month, value),
            _ => None,
        };
        if let Some(date) = candidate {
            self.date = date;
        }
    }

    fn step(&mut self, delta: i32) {
        let stepped = match self.date_part {
            DatePart::Year => {
                let months = Months::new(12);
                if delta > 0 {
                    self.date.checked_add_months(months)
                } else {
                    self.date.checked_sub_months(months)
                }
            }
            DatePart::Month => {
                let months = Months::new(1);
                if delta > 0 {
                    self.date.checked_add_months(months)
                } else {
                    self.date.checked_sub_months(months)
                }
            }
            DatePart::Day => {
                if delta > 0 {
                    self.date.succ_opt()
                } else {
                    self.date.pred_opt()
                }
            }
        };
        if let Some(date) = stepped {
            self.date = date;
        }
        self.typed.clear();
    }

    /// `2024-[03]-09` while editing the month; the active part is bracketed.
    pub fn display(&self, editing: bool) -> String {
        let year = format!("{:04}", self.date.year());
        let month = format!("{:02}", self.date.month());
        let day = format!("{:02}", self.date.day());
        if !editing {
            return format!("{year}-{month}-{day}");
        }

        let marker = |part: DatePart, value: &str| {
            if part != self.date_part {
                value.to_string()
            } else if self.typed.is_empty() {
                format!("[{value}]")
            } else {
                format!("[{}]", self.typed)
            }
        };
        format!(
            "{}-{}-{}",
            marker(DatePart::Year, &year),
            marker(DatePart::Month, &month),
            marker(DatePart::Day, &day)
        )
    }
}

/// Same day in another month, pulled back to the month's last day if needed.
fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    (1..=day)
        .rev()
        .find_map(|d| NaiveDate::from_ymd_opt(year, month, d))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn type_digits(state: &mut DateInputState, digits: &str) {
        for c in digits.chars() {
            state.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_a_full_date_walks_through_the_parts() {
        let mut state = DateInputState::new(date(2024, 1, 1));
        state.begin_editing();
        type_digits(&mut state, "20230715");
        assert_eq!(state.date, date(2023, 7, 15));
        assert_eq!(state.date_part, DatePart::Year);
    }

    #[test]
    fn month_change_clamps_the_day() {
        let mut state = DateInputState::new(date(2024, 3, 31));
        state.next_date_part();
        type_digits(&mut state, "02");
        assert_eq!(state.date, date(2024, 2, 29));
    }

    #[test]
    fn invalid_day_is_ignored() {
        let mut state = DateInputState::new(date(2023, 2, 10));
        state.next_date_part();
        state.next_date_part();
        type_digits(&mut state, "30");
        assert_eq!(state.date, date(2023, 2, 10));
    }

    #[test]
    fn arrows_step_the_selected_part() {
        let mut state = DateInputState::new(date(2024, 12, 31));
        state.next_date_part();
        state.next_date_part();
        state.handle_key(KeyCode::Up);
        assert_eq!(state.date, date(2025, 1, 1));

        state.previous_date_part();
        state.handle_key(KeyCode::Down);
        assert_eq!(state.date, date(2024, 12, 1));
    }

    #[test]
    fn display_marks_the_active_part() {
        let mut state = DateInputState::new(date(2024, 3, 9));
        assert_eq!(state.display(false), "2024-03-09");
        state.next_date_part();
        assert_eq!(state.display(true), "2024-[03]-09");
        state.handle_key(KeyCode::Char('1'));
        assert_eq!(state.display(true), "2024-[1]-09");
    }
}
