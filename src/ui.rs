use colored::Colorize;

// RGB tuple constants for use with the `colored` crate's `.truecolor()` method
pub mod rgb {
    pub const ELECTRIC_PURPLE: (u8, u8, u8) = (225, 53, 255);
    pub const NEON_CYAN: (u8, u8, u8) = (128, 255, 234);
    pub const SUCCESS_GREEN: (u8, u8, u8) = (80, 250, 123);
    pub const DIM_WHITE: (u8, u8, u8) = (180, 180, 190);
}

pub fn print_info(message: &str) {
    println!("{}", message.cyan().bold());
}

pub fn print_warning(message: &str) {
    println!("{}", message.yellow().bold());
}

pub fn print_error(message: &str) {
    eprintln!("{}", message.red().bold());
}

pub fn print_success(message: &str) {
    println!("{}", message.green().bold());
}

pub fn print_dim(message: &str) {
    let (r, g, b) = rgb::DIM_WHITE;
    println!("{}", message.truecolor(r, g, b));
}

pub fn print_version(version: &str) {
    let (pr, pg, pb) = rgb::ELECTRIC_PURPLE;
    let (cr, cg, cb) = rgb::NEON_CYAN;
    println!(
        "{} {} {}",
        "anc (add-n-commit)".truecolor(pr, pg, pb).bold(),
        "version".truecolor(cr, cg, cb),
        version.green()
    );
    print_dim("AI-powered git commit message generator");
}

/// Mask an API key for display: first 3 and last 4 characters survive.
///
/// Keys of 8 characters or fewer are fully hidden.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "********".to_string();
    }
    let head: String = chars.iter().take(3).collect();
    let tail: String = chars.iter().skip(chars.len() - 4).collect();
    format!("{head}...{tail}")
}
