use clap::{Args, Subcommand};
use timerdeck_core::BrandingUpdate;

use super::{print_json, Workspace};

#[derive(Args)]
pub struct BrandingArgs {
    /// Theme color (e.g. "#3b82f6")
    #[arg(long)]
    theme_color: Option<String>,
    /// Logo URI
    #[arg(long, conflicts_with = "clear_logo")]
    logo: Option<String>,
    /// Company name
    #[arg(long, conflicts_with = "clear_company")]
    company: Option<String>,
    /// Remove the logo
    #[arg(long)]
    clear_logo: bool,
    /// Remove the company name
    #[arg(long)]
    clear_company: bool,
}

impl BrandingArgs {
    fn into_update(self) -> BrandingUpdate {
        let optional = |value: Option<String>, clear: bool| {
            if clear {
                Some(None)
            } else {
                value.map(Some)
            }
        };
        BrandingUpdate {
            logo_ref: optional(self.logo, self.clear_logo),
            theme_color: self.theme_color,
            company_name: optional(self.company, self.clear_company),
        }
    }
}

#[derive(Subcommand)]
pub enum BrandingAction {
    /// Update some branding fields
    Set(BrandingArgs),
    /// Restore the configured default branding
    Reset,
    /// Show current branding
    Show,
}

pub fn run(action: BrandingAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ws = Workspace::open()?;
    match action {
        BrandingAction::Set(args) => print_json(&ws.engine.set_branding(args.into_update()))?,
        BrandingAction::Reset => print_json(&ws.engine.reset_branding())?,
        BrandingAction::Show => print_json(ws.engine.branding())?,
    }
    ws.finish();
    Ok(())
}
