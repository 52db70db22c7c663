use crate::app::{AppContext, Result, ScoopError};
use crate::domain::{
    Article, Credentials, Failure, FeedIdentity, Profile, SignupRequest, KNOWN_CATEGORIES,
    KNOWN_SOURCES,
};
use crate::feed::{FeedController, FeedView};

/// Print up to `pages` pages of `identity`, fetched through the feed controller.
pub async fn list_news(ctx: &AppContext, identity: FeedIdentity, pages: u32) -> Result<()> {
    let mut controller = ctx.feed_controller();
    load_pages(&mut controller, identity, pages).await;

    let state = controller.state();
    match controller.view() {
        FeedView::LoadingEmpty => {}
        FeedView::Error { failure } => return Err(login_hint(failure.clone())),
        FeedView::Empty => println!("No articles found"),
        FeedView::Populated {
            items, has_more, ..
        } => {
            println!("{}\n", state.identity.label());
            for article in items {
                println!("{}", format_article_line(article));
            }
            if let Some(failure) = &state.last_error {
                eprintln!("\nStopped early: {}", failure);
            } else if has_more {
                println!(
                    "\nMore articles available (use --pages {})",
                    state.next_page
                );
            }
        }
    }

    Ok(())
}

async fn load_pages(controller: &mut FeedController, identity: FeedIdentity, pages: u32) {
    controller.observe(identity);
    controller.settle().await;

    for _ in 1..pages.max(1) {
        if let Err(refused) = controller.load_more() {
            tracing::debug!("Not loading further pages: {}", refused);
            break;
        }
        controller.settle().await;
    }
}

pub async fn show_article(ctx: &AppContext, id: &str) -> Result<()> {
    let article = ctx.api.article(id).await?;

    println!("{}", article.display_title());
    let byline = article.byline();
    if !byline.is_empty() {
        println!("{}", byline);
    }
    if let Some(ts) = article.timestamp() {
        println!("{}", ts.format("%Y-%m-%d %H:%M UTC"));
    }
    if !article.category.is_empty() {
        println!("Category: {}", article.category);
    }
    if !article.tags.is_empty() {
        println!("Tags: {}", article.tags.join(", "));
    }
    println!();

    if let Some(ai) = &article.ai_summary {
        println!("AI summary:\n{}\n", ai);
    }
    let summary = article.display_summary();
    if !summary.is_empty() {
        println!("{}\n", summary);
    }
    println!("{}", article.link);
    Ok(())
}

pub async fn refresh(ctx: &AppContext) -> Result<()> {
    println!("Refreshing news sources...");
    ctx.api.refresh_news().await?;
    println!("Refresh complete");
    Ok(())
}

pub async fn login(ctx: &AppContext, username: String, password: String) -> Result<()> {
    let user = ctx.api.login(&Credentials { username, password }).await?;
    ctx.save_session(Some(user.username.clone()))?;
    println!("Logged in as {}", user.username);
    Ok(())
}

pub async fn signup(
    ctx: &AppContext,
    username: String,
    email: String,
    password: String,
) -> Result<()> {
    let request = SignupRequest {
        username,
        email,
        password,
    };
    let user = ctx.api.signup(&request).await?;
    ctx.save_session(Some(user.username.clone()))?;
    println!("Account created, logged in as {}", user.username);
    Ok(())
}

/// Always forgets the local session; an expired server session is not an error.
pub async fn logout(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.logout().await;
    ctx.clear_session()?;

    match result {
        Ok(()) => {
            println!("Logged out");
            Ok(())
        }
        Err(failure) if failure.is_unauthenticated() => {
            println!("Not logged in");
            Ok(())
        }
        Err(failure) => Err(failure.into()),
    }
}

pub async fn status(ctx: &AppContext) -> Result<()> {
    println!("Server: {}", ctx.api.base_url());
    match ctx.api.auth_status().await? {
        Some(user) if user.email.is_empty() => println!("Logged in as {}", user.username),
        Some(user) => println!("Logged in as {} <{}>", user.username, user.email),
        None => match ctx.saved_username() {
            Some(username) => println!("Session for {} has expired; log in again", username),
            None => println!("Not logged in"),
        },
    }
    Ok(())
}

/// Without toggles, print the profile. With toggles, flip each named
/// preference and save.
pub async fn profile(ctx: &AppContext, categories: &[String], sources: &[String]) -> Result<()> {
    let mut profile = ctx.api.profile().await.map_err(login_hint)?;

    if categories.is_empty() && sources.is_empty() {
        print_profile(&profile);
        return Ok(());
    }

    for category in categories {
        if !KNOWN_CATEGORIES.contains(&category.as_str()) {
            eprintln!("Note: {} is not a category the server knows", category);
        }
        profile.toggle_category(category);
    }
    for source in sources {
        if !KNOWN_SOURCES.contains(&source.as_str()) {
            eprintln!("Note: {} is not a source the server knows", source);
        }
        profile.toggle_source(source);
    }

    let saved = ctx
        .api
        .update_profile(&profile.to_update())
        .await
        .map_err(login_hint)?;
    println!("Preferences saved\n");
    print_profile(&saved);
    Ok(())
}

fn print_profile(profile: &Profile) {
    println!("{} <{}>", profile.username, profile.email);
    println!("Categories: {}", join_or_none(&profile.preferred_categories));
    println!("Sources:    {}", join_or_none(&profile.preferred_sources));
    if !profile.has_preferences() {
        println!("\nNo preferences set; the For You feed falls back to the latest news.");
    }
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}

fn login_hint(failure: Failure) -> ScoopError {
    if failure.is_unauthenticated() {
        ScoopError::NotLoggedIn
    } else {
        failure.into()
    }
}

pub(crate) fn format_article_line(article: &Article) -> String {
    let date = article
        .timestamp()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "          ".to_string());
    let byline = article.byline();

    if byline.is_empty() {
        format!("{} {}  [{}]", date, article.display_title(), article.id)
    } else {
        format!(
            "{} {}  [{}]\n           {}",
            date,
            article.display_title(),
            article.id,
            byline
        )
    }
}
