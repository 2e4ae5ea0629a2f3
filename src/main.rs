use std::error::Error;
use std::io;
use std::path::PathBuf;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use yearwheel_gantt::aggregate::available_years;
use yearwheel_gantt::calendar::midnight;
use yearwheel_gantt::config::{GanttConfig, load_config, resolve_config_path};
use yearwheel_gantt::domain::{Wheel, generate_id};
use yearwheel_gantt::error::SplitError;
use yearwheel_gantt::export::{ExportRange, export_rows, legend, resolve_export_range};
use yearwheel_gantt::grouping::group_info;
use yearwheel_gantt::{
	GanttSession, GroupBy, Locale, TickOptions, TimeScale, WeekDisplay, YearFilter, ZoomLevel,
	consolidate_and_group, generate_ticks, split_across_years, split_backwards,
};

#[derive(Debug, Parser)]
#[command(name = "yearwheel-gantt", about = "Gantt timeline queries over a year-wheel document")]
struct Cli {
	/// Wheel document (JSON).
	#[arg(long, env = "YEARWHEEL_WHEEL")]
	wheel: PathBuf,
	#[arg(long)]
	config: Option<PathBuf>,
	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Years that have a page.
	Years,
	/// Grouped rows after cross-year consolidation.
	Rows {
		#[command(flatten)]
		view: ViewArgs,
		#[arg(long)]
		json: bool,
	},
	/// Axis ticks for a date range.
	Ticks {
		#[arg(long)]
		start: NaiveDate,
		/// Last day shown, inclusive.
		#[arg(long)]
		end: NaiveDate,
		#[arg(long)]
		zoom: Option<ZoomLevel>,
		#[arg(long)]
		width: Option<f64>,
		#[arg(long)]
		locale: Option<Locale>,
		#[arg(long)]
		week_display: Option<WeekDisplay>,
		#[arg(long)]
		show_year: bool,
		#[arg(long)]
		json: bool,
	},
	/// Row offsets and bar placement for the chosen view.
	Layout {
		#[command(flatten)]
		view: ViewArgs,
		#[arg(long)]
		expand_all: bool,
		#[arg(long)]
		zoom: Option<ZoomLevel>,
		#[arg(long)]
		width: Option<f64>,
	},
	/// Table rows for export, as JSON.
	Export {
		#[command(flatten)]
		view: ViewArgs,
		#[arg(long, default_value = "smart")]
		range: String,
		/// First month of a custom range (YYYY-MM).
		#[arg(long)]
		from: Option<String>,
		/// Last month of a custom range (YYYY-MM).
		#[arg(long)]
		to: Option<String>,
	},
	/// Cross-year segments an item would be split into. Nothing is written back.
	Split {
		#[arg(long)]
		item: String,
		/// Move the end to this date, adding segments for later years.
		#[arg(long, conflicts_with = "since", required_unless_present = "since")]
		until: Option<NaiveDate>,
		/// Move the start to this date, adding segments for earlier years.
		#[arg(long)]
		since: Option<NaiveDate>,
	},
}

#[derive(Debug, Args)]
struct ViewArgs {
	#[arg(long, default_value = "all")]
	year: YearFilter,
	#[arg(long, default_value = "rings")]
	group_by: GroupBy,
}

fn main() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.try_init();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> Result<(), Box<dyn Error>> {
	let cli = Cli::parse();
	let config = match resolve_config_path(cli.config) {
		Some(path) => load_config(&path)?,
		None => GanttConfig::default(),
	};
	let wheel = yearwheel_gantt::storage::load_wheel(&cli.wheel)?;

	match cli.command {
		Command::Years => {
			let years = available_years(&wheel.pages);
			if years.is_empty() {
				println!("no pages yet");
			}
			for year in years {
				println!("{year}");
			}
		}
		Command::Rows { view, json } => print_rows(&wheel, &view, json)?,
		Command::Ticks {
			start,
			end,
			zoom,
			width,
			locale,
			week_display,
			show_year,
			json,
		} => {
			let zoom = zoom.unwrap_or(config.zoom);
			let view_end = end.succ_opt().map(midnight).unwrap_or(NaiveDateTime::MAX);
			let scale = TimeScale::new(midnight(start), view_end, width.unwrap_or(config.container_width), zoom);
			let options = TickOptions {
				week_display: week_display.unwrap_or(config.week_display),
				show_year,
			};
			let set = generate_ticks(&scale, zoom, &locale.unwrap_or(config.locale), options);
			if json {
				println!("{}", serde_json::to_string_pretty(&set)?);
			} else {
				for tick in &set.ticks {
					println!(
						"{:>9.1} | {:>7.1} | {}{}",
						tick.x,
						tick.width,
						tick.label,
						tick.secondary
							.as_deref()
							.map(|year| format!(" '{year}"))
							.unwrap_or_default()
					);
				}
			}
		}
		Command::Layout {
			view,
			expand_all,
			zoom,
			width,
		} => {
			let mut config = config;
			config.zoom = zoom.unwrap_or(config.zoom);
			config.container_width = width.unwrap_or(config.container_width);
			let mut session = view_session(&config, &view);
			if expand_all {
				session.expand_all(&wheel.pages, &wheel.structure);
			}
			let layout = session.layout(&wheel.pages, &wheel.structure).clone();
			let bars = session.bars(&wheel.pages, &wheel.structure);
			let today_x = session.today_marker(Local::now().naive_local());
			let output = json!({
				"layout": layout,
				"bars": bars,
				"ticks": session.ticks(),
				"todayX": today_x,
			});
			println!("{}", serde_json::to_string_pretty(&output)?);
		}
		Command::Export {
			view,
			range,
			from,
			to,
		} => {
			let range = ExportRange::parse(&range, from.as_deref(), to.as_deref())?;
			let session = view_session(&config, &view);
			let data = consolidate_and_group(&wheel.pages, &wheel.structure, view.year, view.group_by);
			let (view_start, view_end) = session.view();
			let bounds = resolve_export_range(
				range,
				&data.all_items,
				&available_years(&wheel.pages),
				(view_start.date(), (view_end - Duration::days(1)).date()),
			);
			let rows = export_rows(&data.grouped_items, &wheel.structure, view.group_by, bounds);
			let output = json!({
				"start": bounds.0,
				"end": bounds.1,
				"rows": rows,
				"legend": legend(&data.all_items, &wheel.structure),
			});
			println!("{}", serde_json::to_string_pretty(&output)?);
		}
		Command::Split { item, until, since } => {
			let target = wheel
				.item(&item)
				.ok_or_else(|| SplitError::UnknownItem(item.clone()))?;
			let segments = match (until, since) {
				(Some(until), _) => split_across_years(target, until, generate_id)?,
				(None, Some(since)) => split_backwards(target, since, generate_id)?,
				(None, None) => vec![target.clone()],
			};
			println!("{}", serde_json::to_string_pretty(&segments)?);
		}
	}

	Ok(())
}

fn view_session(config: &GanttConfig, view: &ViewArgs) -> GanttSession {
	let mut session = GanttSession::new(Local::now().date_naive(), config);
	session.set_year_filter(view.year);
	session.set_group_by(view.group_by);
	session
}

fn print_rows(wheel: &Wheel, view: &ViewArgs, json: bool) -> Result<(), Box<dyn Error>> {
	let data = consolidate_and_group(&wheel.pages, &wheel.structure, view.year, view.group_by);
	if json {
		println!("{}", serde_json::to_string_pretty(&data.grouped_items)?);
		return Ok(());
	}

	if data.grouped_items.is_empty() {
		println!("no groups for {}", view.group_by);
		return Ok(());
	}

	for (key, items) in &data.grouped_items {
		let info = group_info(key, &wheel.structure, view.group_by);
		println!("{} ({})", info.name, items.len());
		for item in items {
			let segments = if item.is_cross_year() {
				format!(" | {} segments", item.segment_ids.len())
			} else {
				String::new()
			};
			println!(
				"  {} | {} | {} .. {}{}",
				item.id(),
				item.item.name,
				item.start_date().format("%Y-%m-%d"),
				item.end_date().format("%Y-%m-%d"),
				segments
			);
		}
	}

	if !data.irregularities.is_empty() {
		eprintln!("warning: {} item reference(s) could not be resolved", data.irregularities.len());
	}

	Ok(())
}
