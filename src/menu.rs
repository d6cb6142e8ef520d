// 🧭 Interaction Loop - text menus as an explicit state machine
//
//   MainMenu --1--> Filter ------------+
//            --2--> Sort --------------+--> Display(cars) --> MainMenu
//            --3--> Display(all) ------+
//            --4--> SortByTypeCurrency-+
//            --5--> Exit
//
// Input and output are injected (`BufRead` / `Write`), so every path can be
// driven by a script. Bad input is reported and control returns to the
// main menu; only console I/O failures escape `run`.

use crate::error::SessionError;
use crate::model::{Car, INPUT_DATE_HINT};
use crate::presenter::OutputFormat;
use crate::query;
use log::debug;
use std::io::{BufRead, Write};

const INVALID_MAIN_CHOICE: &str = "Invalid choice. Please try again.";
const INVALID_CHOICE: &str = "Invalid choice.";

// ============================================================================
// STATES
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum MenuState {
    MainMenu,
    Filter,
    Sort,
    /// Format choice for a result set
    Display { cars: Vec<Car> },
    SortByTypeCurrency,
    Exit,
}

impl MenuState {
    pub fn name(&self) -> &'static str {
        match self {
            MenuState::MainMenu => "MainMenu",
            MenuState::Filter => "Filter",
            MenuState::Sort => "Sort",
            MenuState::Display { .. } => "Display",
            MenuState::SortByTypeCurrency => "SortByTypeCurrency",
            MenuState::Exit => "Exit",
        }
    }
}

// ============================================================================
// TRANSITION TABLES
// ============================================================================

/// A numbered menu: title plus `(number, label, choice)` rows
pub struct Menu<T: 'static> {
    pub title: &'static str,
    pub options: &'static [(u32, &'static str, T)],
}

impl<T: Copy + 'static> Menu<T> {
    pub fn lookup(&self, number: u32) -> Option<T> {
        self.options
            .iter()
            .find(|(n, _, _)| *n == number)
            .map(|(_, _, choice)| *choice)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainChoice {
    Filter,
    Sort,
    Display,
    SortByTypeCurrency,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChoice {
    BrandAndPrice,
    BrandAndDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortChoice {
    ReleaseDate,
    MaxPrice,
}

pub const MAIN_MENU: Menu<MainChoice> = Menu {
    title: "Main Menu:",
    options: &[
        (1, "Filter cars", MainChoice::Filter),
        (2, "Sort cars", MainChoice::Sort),
        (3, "Display cars", MainChoice::Display),
        (4, "Sort by type with specific currencies", MainChoice::SortByTypeCurrency),
        (5, "Exit", MainChoice::Exit),
    ],
};

pub const FILTER_MENU: Menu<FilterChoice> = Menu {
    title: "Filter Options:",
    options: &[
        (1, "By Brand and Price", FilterChoice::BrandAndPrice),
        (2, "By Brand and Release Date", FilterChoice::BrandAndDate),
    ],
};

pub const SORT_MENU: Menu<SortChoice> = Menu {
    title: "Sort Options:",
    options: &[
        (1, "By Release Date (Latest to Oldest)", SortChoice::ReleaseDate),
        (2, "By Price (Highest to Lowest)", SortChoice::MaxPrice),
    ],
};

pub const FORMAT_MENU: Menu<OutputFormat> = Menu {
    title: "Output Format Options:",
    options: &[
        (1, "Table Format", OutputFormat::Table),
        (2, "XML Format", OutputFormat::Xml),
        (3, "JSON Format", OutputFormat::Json),
    ],
};

// ============================================================================
// SESSION
// ============================================================================

pub struct Session<'a, R, W> {
    cars: &'a [Car],
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(cars: &'a [Car], input: R, output: W) -> Self {
        Session {
            cars,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run from the main menu until Exit or end of input
    pub fn run(&mut self) -> Result<(), SessionError> {
        let mut state = MenuState::MainMenu;

        while state != MenuState::Exit {
            let from_main = state == MenuState::MainMenu;
            let from = state.name();

            state = match self.step(state) {
                Ok(next) => next,
                Err(err) => self.recover(err, from_main)?,
            };

            debug!("{} -> {}", from, state.name());
        }

        Ok(())
    }

    /// Perform one state's interaction and return the next state.
    ///
    /// Recoverable input errors are returned as-is; `run` turns them into
    /// a console message and a return to the main menu.
    pub fn step(&mut self, state: MenuState) -> Result<MenuState, SessionError> {
        match state {
            MenuState::MainMenu => self.main_menu(),
            MenuState::Filter => self.filter_menu(),
            MenuState::Sort => self.sort_menu(),
            MenuState::Display { cars } => self.display_menu(&cars),
            MenuState::SortByTypeCurrency => {
                let sorted = query::sort_by_type_specific_currency(self.cars);
                self.say("\nSorted by Type with specific currencies (SUV-EUR, Sedan-JPY, Truck-USD):")?;
                Ok(MenuState::Display { cars: sorted })
            }
            MenuState::Exit => Ok(MenuState::Exit),
        }
    }

    fn recover(&mut self, err: SessionError, from_main: bool) -> Result<MenuState, SessionError> {
        let message = match err {
            SessionError::Io(_) => return Err(err),
            SessionError::InvalidMenuChoice(_) if from_main => INVALID_MAIN_CHOICE.to_string(),
            SessionError::InvalidMenuChoice(_) => INVALID_CHOICE.to_string(),
            SessionError::InvalidDateInput(_) => format!(
                "Invalid date! Use format: {} (e.g., 2023,31,01)",
                INPUT_DATE_HINT
            ),
            SessionError::InvalidPriceInput(_) => {
                "Invalid price! Enter a number (e.g., 50000)".to_string()
            }
        };

        debug!("Recovered from {}", err);
        self.say(&message)?;
        Ok(MenuState::MainMenu)
    }

    // ========================================================================
    // STATE HANDLERS
    // ========================================================================

    fn main_menu(&mut self) -> Result<MenuState, SessionError> {
        write!(self.output, "\n{}\n\n", MAIN_MENU.title)?;
        self.write_options(&MAIN_MENU)?;

        let Some(choice) = self.read_choice(&MAIN_MENU, "\nEnter your choice: ")? else {
            return Ok(MenuState::Exit);
        };

        Ok(match choice {
            MainChoice::Filter => MenuState::Filter,
            MainChoice::Sort => MenuState::Sort,
            MainChoice::Display => MenuState::Display {
                cars: self.cars.to_vec(),
            },
            MainChoice::SortByTypeCurrency => MenuState::SortByTypeCurrency,
            MainChoice::Exit => {
                self.say("Exiting...")?;
                MenuState::Exit
            }
        })
    }

    fn filter_menu(&mut self) -> Result<MenuState, SessionError> {
        self.write_submenu(&FILTER_MENU)?;

        let Some(choice) = self.read_choice(&FILTER_MENU, "Enter your choice: ")? else {
            return Ok(MenuState::Exit);
        };
        let Some(brand) = self.prompt("Enter brand: ")? else {
            return Ok(MenuState::Exit);
        };

        let filtered = match choice {
            FilterChoice::BrandAndPrice => {
                let Some(raw) = self.prompt("Enter minimum price: ")? else {
                    return Ok(MenuState::Exit);
                };
                let min_price = query::parse_min_price(&raw)?;
                query::filter_by_brand_and_min_price(self.cars, &brand, min_price)
            }
            FilterChoice::BrandAndDate => {
                let label = format!("Enter date ({} e.g.: 2023,31,01): ", INPUT_DATE_HINT);
                let Some(raw) = self.prompt(&label)? else {
                    return Ok(MenuState::Exit);
                };
                query::filter_by_brand_and_date(self.cars, &brand, &raw)?
            }
        };

        self.say("\nFiltered Results:")?;
        Ok(MenuState::Display { cars: filtered })
    }

    fn sort_menu(&mut self) -> Result<MenuState, SessionError> {
        self.write_submenu(&SORT_MENU)?;

        let Some(choice) = self.read_choice(&SORT_MENU, "Enter your choice: ")? else {
            return Ok(MenuState::Exit);
        };

        let (sorted, heading) = match choice {
            SortChoice::ReleaseDate => (
                query::sort_by_release_date_descending(self.cars),
                "\nSorted by Release Date (Latest to Oldest):",
            ),
            SortChoice::MaxPrice => (
                query::sort_by_max_price_descending(self.cars),
                "\nSorted by Price (Highest to Lowest):",
            ),
        };

        self.say(heading)?;
        Ok(MenuState::Display { cars: sorted })
    }

    fn display_menu(&mut self, cars: &[Car]) -> Result<MenuState, SessionError> {
        self.write_submenu(&FORMAT_MENU)?;

        let Some(format) = self.read_choice(&FORMAT_MENU, "Enter your choice: ")? else {
            return Ok(MenuState::Exit);
        };

        if format == OutputFormat::Table {
            writeln!(self.output)?;
        }
        write!(self.output, "{}", format.render(cars))?;
        Ok(MenuState::MainMenu)
    }

    // ========================================================================
    // CONSOLE HELPERS
    // ========================================================================

    fn say(&mut self, line: &str) -> Result<(), SessionError> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    fn write_options<T: 'static>(&mut self, menu: &Menu<T>) -> Result<(), SessionError> {
        for (number, label, _) in menu.options {
            writeln!(self.output, "{}. {}", number, label)?;
        }
        Ok(())
    }

    fn write_submenu<T: 'static>(&mut self, menu: &Menu<T>) -> Result<(), SessionError> {
        write!(self.output, "\n{}\n", menu.title)?;
        self.write_options(menu)
    }

    /// Print a prompt and read one line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>, SessionError> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("End of input");
            return Ok(None);
        }

        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Prompt for a menu number and look it up
    fn read_choice<T: Copy + 'static>(
        &mut self,
        menu: &Menu<T>,
        label: &str,
    ) -> Result<Option<T>, SessionError> {
        let Some(raw) = self.prompt(label)? else {
            return Ok(None);
        };

        raw.trim()
            .parse::<u32>()
            .ok()
            .and_then(|n| menu.lookup(n))
            .map(Some)
            .ok_or(SessionError::InvalidMenuChoice(raw))
    }
}

/// Run a session over any input/output pair
pub fn run_session<R: BufRead, W: Write>(cars: &[Car], input: R, output: W) -> Result<(), SessionError> {
    Session::new(cars, input, output).run()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Prices;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::io::Cursor;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn catalog() -> Vec<Car> {
        vec![
            Car::new(Some("SUV".to_string()), Some("X3".to_string()), Prices::new())
                .with_brand("BMW")
                .with_release_date(NaiveDate::from_ymd_opt(2023, 6, 15).unwrap())
                .with_price("EUR", dec("50000"))
                .with_price("USD", dec("55000")),
            Car::new(Some("Sedan".to_string()), Some("Camry".to_string()), Prices::new())
                .with_brand("Toyota")
                .with_release_date(NaiveDate::from_ymd_opt(2021, 1, 31).unwrap())
                .with_price("JPY", dec("3000000"))
                .with_price("USD", dec("26000")),
            Car::new(Some("Truck".to_string()), Some("F150".to_string()), Prices::new())
                .with_brand("Ford")
                .with_release_date(NaiveDate::from_ymd_opt(2022, 3, 9).unwrap())
                .with_price("USD", dec("45000")),
        ]
    }

    fn run_script(script: &str) -> String {
        let cars = catalog();
        let mut session = Session::new(&cars, Cursor::new(script.as_bytes()), Vec::new());
        session.run().unwrap();
        String::from_utf8(session.into_output()).unwrap()
    }

    fn order_of(output: &str, models: &[&str]) -> Vec<usize> {
        models
            .iter()
            .map(|m| output.find(&format!("<model>{m}</model>")).unwrap())
            .collect()
    }

    #[test]
    fn test_main_menu_text() {
        let out = run_script("5\n");
        assert!(out.contains(
            "\nMain Menu:\n\n1. Filter cars\n2. Sort cars\n3. Display cars\n4. Sort by type with specific currencies\n5. Exit\n\nEnter your choice: "
        ));
        assert!(out.ends_with("Exiting...\n"));
    }

    #[test]
    fn test_invalid_main_choice_reprompts() {
        let out = run_script("9\n5\n");
        assert!(out.contains(INVALID_MAIN_CHOICE));
        assert_eq!(out.matches("Main Menu:").count(), 2);
        assert!(out.ends_with("Exiting...\n"));
    }

    #[test]
    fn test_non_numeric_choice_does_not_crash() {
        let out = run_script("abc\n\n5\n");
        assert_eq!(out.matches(INVALID_MAIN_CHOICE).count(), 2);
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let out = run_script("");
        assert!(out.contains("Main Menu:"));
        assert!(!out.contains("Exiting..."));

        // Mid-submenu as well
        let out = run_script("1\n1\nBMW\n");
        assert!(out.contains("Enter minimum price: "));
    }

    #[test]
    fn test_display_all_as_table() {
        let out = run_script("3\n1\n5\n");
        assert!(out.contains("Output Format Options:\n1. Table Format\n2. XML Format\n3. JSON Format\n"));
        assert!(out.contains("| BMW             | SUV        | X3         | 06/15/2023 |"));
        assert!(out.contains("EUR: 50000, USD: 55000"));
        assert_eq!(out.matches("Main Menu:").count(), 2);
    }

    #[test]
    fn test_filter_by_brand_and_price() {
        let out = run_script("1\n1\nbmw\n50000\n3\n5\n");
        assert!(out.contains("Filter Options:\n1. By Brand and Price\n2. By Brand and Release Date\n"));
        assert!(out.contains("\nFiltered Results:\n"));
        assert!(out.contains("\"model\": \"X3\""));
        assert!(!out.contains("Camry"));
    }

    #[test]
    fn test_filter_by_brand_and_date() {
        let out = run_script("1\n2\nford\n2022,09,03\n2\n5\n");
        assert!(out.contains("Enter date (yyyy,dd,MM e.g.: 2023,31,01): "));
        assert!(out.contains("<model>F150</model>"));
        assert!(!out.contains("<model>X3</model>"));
    }

    #[test]
    fn test_filter_bad_date_returns_to_main() {
        let out = run_script("1\n2\nBMW\n06/15/2023\n5\n");
        assert!(out.contains("Invalid date! Use format: yyyy,dd,MM (e.g., 2023,31,01)"));
        assert!(!out.contains("Filtered Results:"));
        assert!(!out.contains("Output Format Options:"));
        assert!(out.ends_with("Exiting...\n"));
    }

    #[test]
    fn test_filter_bad_price_returns_to_main() {
        let out = run_script("1\n1\nBMW\nlots\n5\n");
        assert!(out.contains("Invalid price!"));
        assert!(out.ends_with("Exiting...\n"));
    }

    #[test]
    fn test_invalid_submenu_choice() {
        let out = run_script("2\n7\n5\n");
        assert!(out.contains("Enter your choice: Invalid choice.\n"));
        assert!(!out.contains(INVALID_MAIN_CHOICE));
        assert_eq!(out.matches("Main Menu:").count(), 2);
    }

    #[test]
    fn test_invalid_format_choice() {
        let out = run_script("3\n0\n5\n");
        assert!(out.contains("Enter your choice: Invalid choice.\n"));
        assert!(out.ends_with("Exiting...\n"));
    }

    #[test]
    fn test_sort_by_release_date() {
        let out = run_script("2\n1\n2\n5\n");
        assert!(out.contains("Sorted by Release Date (Latest to Oldest):"));
        let pos = order_of(&out, &["X3", "F150", "Camry"]);
        assert!(pos[0] < pos[1] && pos[1] < pos[2]);
    }

    #[test]
    fn test_sort_by_max_price() {
        let out = run_script("2\n2\n2\n5\n");
        assert!(out.contains("Sorted by Price (Highest to Lowest):"));
        let pos = order_of(&out, &["Camry", "X3", "F150"]);
        assert!(pos[0] < pos[1] && pos[1] < pos[2]);
    }

    #[test]
    fn test_sort_by_type_currency() {
        let out = run_script("4\n2\n5\n");
        assert!(out.contains("Sorted by Type with specific currencies (SUV-EUR, Sedan-JPY, Truck-USD):"));
        let pos = order_of(&out, &["Camry", "X3", "F150"]);
        assert!(pos[0] < pos[1] && pos[1] < pos[2]);
    }

    #[test]
    fn test_step_transitions() {
        let cars = catalog();

        let mut session = Session::new(&cars, Cursor::new("1\n".as_bytes()), Vec::new());
        assert_eq!(session.step(MenuState::MainMenu).unwrap(), MenuState::Filter);

        let mut session = Session::new(&cars, Cursor::new("3\n".as_bytes()), Vec::new());
        assert_eq!(
            session.step(MenuState::MainMenu).unwrap(),
            MenuState::Display { cars: cars.clone() }
        );

        let mut session = Session::new(&cars, Cursor::new("2\n".as_bytes()), Vec::new());
        match session.step(MenuState::Sort).unwrap() {
            MenuState::Display { cars: sorted } => {
                assert_eq!(sorted[0].model.as_deref(), Some("Camry"));
            }
            other => panic!("unexpected state {}", other.name()),
        }

        let mut session = Session::new(&cars, Cursor::new("1\n".as_bytes()), Vec::new());
        let next = session.step(MenuState::Display { cars: Vec::new() }).unwrap();
        assert_eq!(next, MenuState::MainMenu);
    }

    #[test]
    fn test_step_surfaces_invalid_choice() {
        let cars = catalog();
        let mut session = Session::new(&cars, Cursor::new("42\n".as_bytes()), Vec::new());
        let err = session.step(MenuState::MainMenu).unwrap_err();
        assert!(matches!(err, SessionError::InvalidMenuChoice(raw) if raw == "42"));
    }

    #[test]
    fn test_menu_lookup() {
        assert_eq!(MAIN_MENU.lookup(5), Some(MainChoice::Exit));
        assert_eq!(MAIN_MENU.lookup(6), None);
        assert_eq!(FORMAT_MENU.lookup(2), Some(OutputFormat::Xml));
        assert_eq!(SORT_MENU.lookup(0), None);
    }

    #[test]
    fn test_catalog_unchanged_by_session() {
        let cars = catalog();
        let before = cars.clone();
        let mut session = Session::new(&cars, Cursor::new("2\n2\n1\n4\n1\n5\n".as_bytes()), Vec::new());
        session.run().unwrap();
        assert_eq!(cars, before);
    }
}
