use std::fmt::Display;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::{debug, info, warn};

use crate::{
    ledger::{
        factors::{lookup, Category},
        parse_quantity, EmissionLedger, LedgerError,
    },
    utils::percentage::Percentage,
};

use super::{
    output::{render_breakdown, render_history, render_suggestion, render_total, OutputStyle, UNIT},
    status::StatusFlash,
};

const MENU: &str = "\
--- Carbon Emission Calculator ---
1. Add Travel
2. Add Electricity / Home Energy
3. Add Food Intake
4. View Activity History
5. View Total Emissions
6. View Breakdown
7. Get Suggestion
8. Reset
9. Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Add(Category),
    History,
    Total,
    Breakdown,
    Suggestion,
    Reset,
    Exit,
}

impl MenuChoice {
    fn parse(input: &str) -> Option<Self> {
        let choice = match input.trim() {
            "1" => MenuChoice::Add(Category::Travel),
            "2" => MenuChoice::Add(Category::Electricity),
            "3" => MenuChoice::Add(Category::Food),
            "4" => MenuChoice::History,
            "5" => MenuChoice::Total,
            "6" => MenuChoice::Breakdown,
            "7" => MenuChoice::Suggestion,
            "8" => MenuChoice::Reset,
            "9" => MenuChoice::Exit,
            _ => return None,
        };
        Some(choice)
    }
}

/// Whether the menu should keep running.
enum Flow {
    Continue,
    Exit,
}

fn added_message(category: Category) -> &'static str {
    match category {
        Category::Travel => "Travel record added.",
        Category::Electricity => "Electricity usage recorded.",
        Category::Food => "Food intake recorded.",
    }
}

/// Line oriented interactive menu. The ledger is borrowed for the whole session, so whoever
/// created it can inspect it after the menu exits.
pub struct Menu<'a, R, W> {
    ledger: &'a mut EmissionLedger,
    lines: Lines<R>,
    output: W,
    status: StatusFlash,
    style: OutputStyle,
    min_percentage: Percentage,
}

impl<'a, R, W> Menu<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(
        ledger: &'a mut EmissionLedger,
        input: R,
        output: W,
        status: StatusFlash,
        style: OutputStyle,
        min_percentage: Percentage,
    ) -> Self {
        Self {
            ledger,
            lines: input.lines(),
            output,
            status,
            style,
            min_percentage,
        }
    }

    /// Runs until the user exits or the input ends.
    pub async fn run(mut self) -> Result<()> {
        loop {
            self.show_menu().await?;
            let Some(input) = self.prompt("Select option: ").await? else {
                debug!("Input closed");
                break;
            };
            let flow = match MenuChoice::parse(&input) {
                Some(choice) => self.handle(choice).await?,
                None => {
                    self.say("Invalid choice.").await?;
                    Flow::Continue
                }
            };
            if let Flow::Exit = flow {
                break;
            }
        }
        self.say("Thank you!").await?;
        self.output.flush().await?;
        Ok(())
    }

    async fn handle(&mut self, choice: MenuChoice) -> Result<Flow> {
        debug!("Menu choice {choice:?}");
        match choice {
            MenuChoice::Add(category) => return self.add(category).await,
            MenuChoice::History => {
                let text = render_history(self.ledger, self.style);
                self.say(text).await?;
            }
            MenuChoice::Total => {
                let text = render_total(self.ledger);
                self.say(text).await?;
            }
            MenuChoice::Breakdown => {
                let text = render_breakdown(self.ledger, self.min_percentage, self.style);
                self.say(text).await?;
            }
            MenuChoice::Suggestion => {
                let text = render_suggestion(self.ledger);
                self.say(text).await?;
            }
            MenuChoice::Reset => {
                self.ledger.reset();
                info!("Ledger reset from menu");
                self.status.flash("All activities cleared.");
            }
            MenuChoice::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    async fn add(&mut self, category: Category) -> Result<Flow> {
        let default = category.default_subcategory();
        let types = category
            .factors()
            .map(|f| f.name)
            .collect::<Vec<_>>()
            .join("/");
        let Some(kind) = self.prompt(&format!("Type ({types}) [{default}]: ")).await? else {
            return Ok(Flow::Exit);
        };
        let kind = match kind.trim() {
            "" => default,
            v => v,
        };

        let factor = match lookup(category, kind) {
            Ok(factor) => factor,
            Err(e) => return self.reject(e).await,
        };

        let Some(quantity) = self
            .prompt(&format!("Enter quantity ({}): ", factor.unit))
            .await?
        else {
            return Ok(Flow::Exit);
        };

        let recorded =
            parse_quantity(&quantity).and_then(|q| self.ledger.record(category, factor.name, q));
        match recorded {
            Ok(kg) => {
                self.status.flash(added_message(category));
                self.say(format!("Emissions: {kg:.2} {UNIT}")).await?;
                Ok(Flow::Continue)
            }
            Err(e) => self.reject(e).await,
        }
    }

    async fn reject(&mut self, error: LedgerError) -> Result<Flow> {
        warn!("Rejected activity: {error}");
        self.say(error).await?;
        Ok(Flow::Continue)
    }

    async fn show_menu(&mut self) -> Result<()> {
        self.say("").await?;
        if let Some(status) = self.status.current() {
            self.say(format!("* {status}")).await?;
        }
        self.say(MENU).await
    }

    /// Returns `None` once the input is exhausted.
    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(self.lines.next_line().await?)
    }

    async fn say(&mut self, text: impl Display) -> Result<()> {
        self.output
            .write_all(format!("{text}\n").as_bytes())
            .await?;
        Ok(())
    }
}
