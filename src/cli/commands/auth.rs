use crate::actions::ActionContext;
use crate::actions::user::get_user_info;
use crate::cli::commands::print_json;
use crate::cli::parser::{AuthCmd, Commands};
use crate::config::Config;
use crate::core::auth::{
    Auth, clear_session_token, load_session_token, save_session_token, sign_out,
};
use crate::core::email::{OutboxMailer, list_outbox};
use crate::core::validation::SignUpForm;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::user::{OtpPurpose, Session, User};
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{GREY, RESET};
use crate::utils::formatting::{bold, local_datetime};

fn signed_in(cfg: &Config, user: &User, session: &Session) -> AppResult<()> {
    save_session_token(cfg, &session.token)?;
    success(format!("Signed in as {} <{}>", user.name, user.email));
    Ok(())
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Auth { action } = cmd else {
        return Ok(());
    };

    let pool = DbPool::new(&cfg.database)?;
    let mailer = OutboxMailer::new(&pool.conn, &cfg.mail_from);
    let auth = Auth::new(&pool.conn, cfg, &mailer);

    match action {
        AuthCmd::Signup {
            name,
            email,
            password,
            confirm_password,
        } => {
            let user = auth.sign_up(&SignUpForm {
                full_name: name.clone(),
                email: email.clone(),
                password: password.clone(),
                confirm_password: confirm_password.clone(),
            })?;
            success(format!("Account created for {}", user.email));
            info("Check your email for the verification code, then run `budgety auth verify`.");
        }

        AuthCmd::Verify {
            email,
            code,
            resend,
        } => {
            if *resend {
                auth.send_otp(email, OtpPurpose::EmailVerification)?;
                success("A new verification code has been sent.");
            } else if let Some(code) = code {
                let (user, session) = auth.verify_email(email, code)?;
                success("Email verified.");
                signed_in(cfg, &user, &session)?;
            }
        }

        AuthCmd::Login { email, password } => {
            let (user, session) = auth.sign_in_password(email, password)?;
            signed_in(cfg, &user, &session)?;
        }

        AuthCmd::Otp { email, code } => match code {
            None => {
                auth.send_otp(email, OtpPurpose::SignIn)?;
                success("Sign-in code sent. Run again with --code to sign in.");
            }
            Some(code) => {
                let (user, session) = auth.sign_in_otp(email, code)?;
                signed_in(cfg, &user, &session)?;
            }
        },

        AuthCmd::ForgotPassword { email } => {
            auth.send_otp(email, OtpPurpose::ForgetPassword)?;
            success("Password reset code sent.");
        }

        AuthCmd::ResetPassword {
            email,
            code,
            password,
        } => {
            auth.reset_password(email, code, password)?;
            clear_session_token(cfg)?;
            success("Password updated. Sign in with your new password.");
        }

        AuthCmd::Logout => {
            match load_session_token(cfg) {
                Some(token) => {
                    if sign_out(&pool.conn, &token)? {
                        ttlog_quiet(&pool.conn, "logout", "", "Signed out");
                    }
                    success("Signed out.");
                }
                None => warning("Not signed in."),
            }
            clear_session_token(cfg)?;
        }

        AuthCmd::Whoami { json } => {
            let ctx = ActionContext::new(&pool.conn, cfg);
            let info = get_user_info(&ctx)
                .into_result()?
                .ok_or(AppError::Unauthorized)?;

            if *json {
                return print_json(&info);
            }

            println!("{}", bold(&info.user.name));
            println!("  Email     : {}", info.user.email);
            println!(
                "  Verified  : {}",
                if info.user.email_verified { "yes" } else { "no" }
            );
            println!("  Member    : {}", local_datetime(&info.user.created_at));
            println!(
                "  Records   : {} income, {} expenses, {} savings",
                info.incomes.len(),
                info.expenses.len(),
                info.savings.len()
            );
        }

        AuthCmd::Outbox { email, limit } => {
            let entries = list_outbox(&pool.conn, email.as_deref())?;
            if entries.is_empty() {
                warning("No messages.");
                return Ok(());
            }

            for entry in entries.iter().take(*limit) {
                println!(
                    "{}#{} {}  →  {}{}",
                    GREY, entry.id, entry.sent_at, entry.recipient, RESET
                );
                println!("{}", bold(&entry.subject));
                for line in textwrap::wrap(&entry.body, 78) {
                    println!("  {}", line);
                }
                println!();
            }
        }
    }

    Ok(())
}
