use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use orders_cli::config::{DEFAULT_TAKE, load_state_file, parse_group_path, resolve_view_state};
use orders_cli::render::{apply_table_style, header_cell, json_view, render_view};
use orders_export::{DocumentExport, ExportReport, SpreadsheetExport, export_store};
use orders_ingest::{
    LoadOptions, LoadedOrders, Locale, LocaleContext, DEFAULT_DATE_FORMATS, load_orders,
    load_sample_orders,
};
use orders_model::{
    DisplayFormat, NodeId, Order, PageDescriptor, Record, RecordId, display_columns,
    order_columns,
};
use orders_view::ViewStateController;

use crate::cli::{DataArgs, DocumentArgs, SpreadsheetArgs, ViewArgs, ViewFormatArg};

fn load(args: &DataArgs) -> Result<(LocaleContext, LoadedOrders)> {
    let locale = LocaleContext::new(&args.locale).context("select locale")?;
    let mut formats = args.date_formats.clone();
    formats.extend(DEFAULT_DATE_FORMATS.iter().map(|format| (*format).to_string()));
    let options = LoadOptions::default()
        .with_date_formats(formats)
        .with_shipped_date(args.shipped_date.into());
    let loaded = match &args.data {
        Some(path) => load_orders(path, &locale, &options)
            .with_context(|| format!("load orders from {}", path.display()))?,
        None => load_sample_orders(&locale, &options).context("load sample orders")?,
    };
    for degraded in &loaded.degraded {
        info!(
            order_id = degraded.order_id,
            field = degraded.field,
            error = %degraded.error,
            "field loaded as missing"
        );
    }
    Ok((locale, loaded))
}

pub fn run_view(args: &ViewArgs) -> Result<()> {
    let span = info_span!("view", locale = %args.data.locale);
    let _guard = span.enter();

    let (locale, loaded) = load(&args.data)?;
    let state = resolve_view_state(args.state.state.as_deref(), &args.state.overrides())?;
    let mut controller =
        ViewStateController::new(loaded.store, state).context("apply view state")?;

    for id in &args.expand {
        controller.set_expanded(NodeId::Record(RecordId(*id)), true);
    }
    for text in &args.collapse_group {
        let path = parse_group_path(text).with_context(|| format!("--collapse-group {text}"))?;
        controller.set_expanded(NodeId::Group(path), false);
    }

    match args.format {
        ViewFormatArg::Table => print!("{}", render_view(&controller, &locale)),
        ViewFormatArg::Json => {
            let json = serde_json::to_string_pretty(&json_view(&controller))
                .context("serialize view")?;
            println!("{json}");
        }
    }
    Ok(())
}

pub fn run_export_spreadsheet(args: &SpreadsheetArgs) -> Result<ExportReport> {
    let (_, loaded) = load(&args.data)?;
    export_store(&SpreadsheetExport::new(&args.output), &loaded.store)
        .with_context(|| format!("export spreadsheet to {}", args.output.display()))
}

pub fn run_export_document(args: &DocumentArgs) -> Result<ExportReport> {
    let (locale, loaded) = load(&args.data)?;
    let base = match &args.state {
        Some(path) => load_state_file(path)?.page,
        None => None,
    }
    .unwrap_or(PageDescriptor::new(0, DEFAULT_TAKE));
    let window = PageDescriptor::new(
        args.skip.unwrap_or(base.skip),
        args.take.unwrap_or(base.take),
    );
    let export = DocumentExport::new(&args.output, locale, window).with_margin(args.margin);
    export_store(&export, &loaded.store)
        .with_context(|| format!("export document to {}", args.output.display()))
}

pub fn print_export_report(report: &ExportReport) {
    println!(
        "Exported {} rows to {} ({})",
        report.rows,
        report.path.display(),
        report.kind.as_str()
    );
}

pub fn run_fields() {
    let columns = order_columns();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Column"),
        header_cell("Width"),
        header_cell("Format"),
        header_cell("Locked"),
        header_cell("Filterable"),
    ]);
    apply_table_style(&mut table);
    for def in Order::schema().fields() {
        let column = columns.iter().find(|column| column.field == def.name);
        let (title, width, format, locked, filterable) = match column {
            Some(column) => (
                column.title.to_string(),
                column.width.to_string(),
                format_name(column.format),
                yes_no(column.locked),
                yes_no(column.filterable),
            ),
            None => ("-".to_string(), "-".to_string(), "-".to_string(), "-", "-"),
        };
        table.add_row(vec![
            def.name.to_string(),
            def.field_type.to_string(),
            title,
            width,
            format,
            locked.to_string(),
            filterable.to_string(),
        ]);
    }
    println!("{table}");
    let order: Vec<&str> = display_columns(columns).iter().map(|column| column.title).collect();
    println!("Column order: {}", order.join(", "));
}

pub fn run_locales() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Tag"),
        header_cell("Short"),
        header_cell("Title"),
        header_cell("Sample"),
    ]);
    apply_table_style(&mut table);
    for locale in Locale::ALL {
        let context = LocaleContext::for_locale(locale).context("load locale")?;
        table.add_row(vec![
            locale.language().to_string(),
            locale.short().to_string(),
            context.message("export.documentTitle").to_string(),
            context.format_number(1234.5, 2),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn format_name(format: DisplayFormat) -> String {
    match format {
        DisplayFormat::Plain => "-".to_string(),
        DisplayFormat::ShortDate => "{0:d}".to_string(),
        DisplayFormat::LongDate => "{0:D}".to_string(),
        DisplayFormat::Decimal(decimals) => format!("{{0:n{decimals}}}"),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
