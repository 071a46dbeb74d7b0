#![allow(clippy::module_name_repetitions)]

//! Interactive explorer session.
//!
//! A menu-driven stand-in for the map and sidebar: each menu action is one
//! UI event (filter change, range change, pointer enter/leave, click, panel
//! close) applied to the [`CrimeExplorer`], after which the resulting map
//! and detail view are printed.

use crime_explorer::{CrimeExplorer, DataStatus, SelectionPhase, format_period};
use dialoguer::Select;

use crate::output::{map_view, print_detail_view, print_map};

/// Actions available in the explorer menu.
enum ExploreAction {
    ShowMap,
    ChooseCategory,
    SetStart,
    SetEnd,
    Hover,
    LeaveMap,
    Click,
    ClosePanel,
    Quit,
}

impl ExploreAction {
    const ALL: &[Self] = &[
        Self::ShowMap,
        Self::ChooseCategory,
        Self::SetStart,
        Self::SetEnd,
        Self::Hover,
        Self::LeaveMap,
        Self::Click,
        Self::ClosePanel,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ShowMap => "Show map",
            Self::ChooseCategory => "Choose crime type",
            Self::SetStart => "Set start month",
            Self::SetEnd => "Set end month",
            Self::Hover => "Hover a region",
            Self::LeaveMap => "Move pointer off the map",
            Self::Click => "Click a region",
            Self::ClosePanel => "Close detail panel",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the menu loop until the user quits.
///
/// # Errors
///
/// Returns an error if a terminal prompt fails.
pub fn run(explorer: &mut CrimeExplorer) -> Result<(), Box<dyn std::error::Error>> {
    if let DataStatus::Unavailable { reason } = explorer.status() {
        println!("Error loading data: {reason}");
        return Ok(());
    }

    let labels: Vec<&str> = ExploreAction::ALL
        .iter()
        .map(ExploreAction::label)
        .collect();

    loop {
        println!();
        print_status_line(explorer);

        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match ExploreAction::ALL[idx] {
            ExploreAction::ShowMap => print_map(&map_view(explorer)),
            ExploreAction::ChooseCategory => choose_category(explorer)?,
            ExploreAction::SetStart => choose_boundary(explorer, true)?,
            ExploreAction::SetEnd => choose_boundary(explorer, false)?,
            ExploreAction::Hover => {
                if let Some(region) = choose_region(explorer, "Hover which region?")? {
                    explorer.on_pointer_enter_region(&region);
                    print_detail_view(explorer);
                }
            }
            ExploreAction::LeaveMap => explorer.on_pointer_leave_all_regions(),
            ExploreAction::Click => {
                if let Some(region) = choose_region(explorer, "Click which region?")? {
                    explorer.on_click_region(&region);
                    print_detail_view(explorer);
                }
            }
            ExploreAction::ClosePanel => explorer.on_close_detail_panel(),
            ExploreAction::Quit => return Ok(()),
        }
    }
}

fn print_status_line(explorer: &CrimeExplorer) {
    let phase = match explorer.selection_phase() {
        SelectionPhase::Idle => "idle".to_string(),
        SelectionPhase::Hovering(region) => format!("hovering {region}"),
        SelectionPhase::Pinned(region) => format!("pinned {region}"),
    };
    println!(
        "[{}] {} · {} crimes · {}",
        explorer.category_filter(),
        explorer
            .period_range_label()
            .unwrap_or_else(|| "no periods".to_string()),
        explorer.total_count(),
        phase
    );
}

fn choose_category(explorer: &mut CrimeExplorer) -> Result<(), Box<dyn std::error::Error>> {
    let options = explorer.category_options();
    let labels: Vec<String> = options
        .iter()
        .map(|o| {
            if o.is_all() {
                "All crimes".to_string()
            } else {
                o.to_string()
            }
        })
        .collect();
    let current = options
        .iter()
        .position(|o| o == explorer.category_filter())
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Crime type")
        .items(&labels)
        .default(current)
        .max_length(20)
        .interact()?;

    explorer.set_category_filter(options[idx].clone());
    Ok(())
}

fn choose_boundary(
    explorer: &mut CrimeExplorer,
    is_start: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let periods = explorer.available_periods().to_vec();
    if periods.is_empty() {
        println!("No periods available.");
        return Ok(());
    }

    let labels: Vec<String> = periods.iter().map(format_period).collect();
    let current = explorer
        .period_bounds()
        .map(|(start, end)| if is_start { start } else { end })
        .and_then(|p| periods.iter().position(|q| q == p))
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt(if is_start { "From" } else { "To" })
        .items(&labels)
        .default(current)
        .max_length(24)
        .interact()?;

    let result = if is_start {
        explorer.set_period_start(&periods[idx])
    } else {
        explorer.set_period_end(&periods[idx])
    };
    if let Err(e) = result {
        println!("Range unchanged: {e}");
    }
    Ok(())
}

fn choose_region(
    explorer: &CrimeExplorer,
    prompt: &str,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let regions = explorer.available_regions();
    if regions.is_empty() {
        println!("No regions available.");
        return Ok(None);
    }

    let idx = Select::new()
        .with_prompt(prompt)
        .items(regions)
        .default(0)
        .max_length(20)
        .interact()?;

    Ok(regions.get(idx).cloned())
}
