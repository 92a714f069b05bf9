use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, anyhow};
use bloggy_client::{BloggyClient, BloggyClientError, ListPostsResponse};
use clap::{Parser, Subcommand};

const TOKEN_FILE: &str = ".bloggy_token";
const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";

#[derive(Debug, Parser)]
#[command(name = "bloggy-cli", version, about = "CLI client for bloggy-server")]
struct Cli {
    /// Server base URL.
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register a user; a verification email is sent.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Redeem an email-verification token.
    Verify {
        #[arg(long)]
        token: String,
    },
    /// Log in and store the token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored token.
    Logout,
    /// Show the logged-in user.
    Me,
    /// Create a post (requires token).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// Stored-image reference from `upload`.
        #[arg(long)]
        image: Option<String>,
    },
    /// Fetch a post by id.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Update a post (requires token).
    ///
    /// If `--content` is omitted, the current content is kept.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete a post (requires token).
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// List posts, newest first.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// List posts by star count descending.
    MostStarred {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// List posts by an author, newest first.
    ByAuthor {
        #[arg(long)]
        author_id: i64,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Star a post (requires token).
    Star {
        #[arg(long)]
        id: i64,
    },
    /// Remove a star from a post (requires token).
    Unstar {
        #[arg(long)]
        id: i64,
    },
    /// List ids of posts you starred (requires token).
    Starred,
    /// Comment on a post (requires token).
    Comment {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        content: String,
    },
    /// List comments for a post.
    Comments {
        #[arg(long)]
        post_id: i64,
    },
    /// Delete one of your comments (requires token).
    DeleteComment {
        #[arg(long)]
        id: i64,
    },
    /// Upload an image (requires token); prints the stored reference.
    Upload {
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = cli
        .server
        .or_else(|| std::env::var("BLOGGY_HTTP_URL").ok())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    let mut client = BloggyClient::new(server);

    if let Some(token) = load_token().context("failed to read the token file")? {
        client.set_token(token);
    }

    match cli.command {
        Command::Register {
            username,
            email,
            password,
        } => {
            let registered = client
                .register(&username, &email, &password)
                .await
                .map_err(map_client_error)?;
            println!(
                "Registered {} (id {}): {}",
                registered.user.username, registered.user.id, registered.message
            );
        }
        Command::Verify { token } => {
            client.verify_email(&token).await.map_err(map_client_error)?;
            println!("Email verified, you can log in now");
        }
        Command::Login { email, password } => {
            let auth = client
                .login(&email, &password)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("failed to persist the token")?;
            println!("Logged in as {} (id {})", auth.user.username, auth.user.id);
        }
        Command::Logout => {
            drop_token().context("failed to remove the token file")?;
            println!("Token removed");
        }
        Command::Me => {
            let user = client.me().await.map_err(map_client_error)?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Command::Create {
            title,
            content,
            image,
        } => {
            let post = client
                .create_post(&title, &content, image.as_deref())
                .await
                .map_err(map_client_error)?;
            println!("Created post {}", post.id);
            println!("{}", serde_json::to_string_pretty(&post)?);
        }
        Command::Get { id } => {
            let post = client.get_post(id).await.map_err(map_client_error)?;
            println!("{}", serde_json::to_string_pretty(&post)?);
        }
        Command::Update {
            id,
            title,
            content,
            image,
        } => {
            let content = match content {
                Some(content) => content,
                None => {
                    client
                        .get_post(id)
                        .await
                        .map_err(map_client_error)?
                        .content
                }
            };
            let post = client
                .update_post(id, &title, &content, image.as_deref())
                .await
                .map_err(map_client_error)?;
            println!("Updated post {}", post.id);
            println!("{}", serde_json::to_string_pretty(&post)?);
        }
        Command::Delete { id } => {
            client.delete_post(id).await.map_err(map_client_error)?;
            println!("Deleted post {id}");
        }
        Command::List { page, limit } => {
            let listed = client
                .list_posts(page, limit)
                .await
                .map_err(map_client_error)?;
            print_post_listing(&listed)?;
        }
        Command::MostStarred { page, limit } => {
            let listed = client
                .list_most_starred_posts(page, limit)
                .await
                .map_err(map_client_error)?;
            print_post_listing(&listed)?;
        }
        Command::ByAuthor {
            author_id,
            page,
            limit,
        } => {
            let listed = client
                .list_posts_by_author(author_id, page, limit)
                .await
                .map_err(map_client_error)?;
            print_post_listing(&listed)?;
        }
        Command::Star { id } => {
            let state = client.star_post(id).await.map_err(map_client_error)?;
            println!("Post {id} starred, {} stars total", state.stars);
        }
        Command::Unstar { id } => {
            let state = client.unstar_post(id).await.map_err(map_client_error)?;
            println!("Post {id} unstarred, {} stars total", state.stars);
        }
        Command::Starred => {
            let post_ids = client.my_starred_posts().await.map_err(map_client_error)?;
            println!("{}", serde_json::to_string_pretty(&post_ids)?);
        }
        Command::Comment { post_id, content } => {
            let comment = client
                .create_comment(post_id, &content)
                .await
                .map_err(map_client_error)?;
            println!("Created comment {} on post {post_id}", comment.id);
        }
        Command::Comments { post_id } => {
            let comments = client
                .comments_for_post(post_id)
                .await
                .map_err(map_client_error)?;
            println!("{}", serde_json::to_string_pretty(&comments)?);
        }
        Command::DeleteComment { id } => {
            client.delete_comment(id).await.map_err(map_client_error)?;
            println!("Deleted comment {id}");
        }
        Command::Upload { file } => {
            let data = fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let filename = file
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| anyhow!("upload path has no usable filename"))?;
            let content_type = guess_content_type(&file)?;

            let upload = client
                .upload_image(filename, content_type, data)
                .await
                .map_err(map_client_error)?;
            println!("Uploaded as {}", upload.filename);
        }
    }

    Ok(())
}

fn print_post_listing(listed: &ListPostsResponse) -> Result<()> {
    println!(
        "Page {} ({} of {} posts)",
        listed.page,
        listed.posts.len(),
        listed.total
    );
    println!("{}", serde_json::to_string_pretty(&listed.posts)?);
    Ok(())
}

fn guess_content_type(path: &Path) -> Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);
    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => Ok("image/jpeg"),
        Some("png") => Ok("image/png"),
        Some("gif") => Ok("image/gif"),
        _ => Err(anyhow!(
            "only .jpeg, .jpg, .png and .gif files can be uploaded"
        )),
    }
}

fn load_token() -> Result<Option<String>> {
    match fs::read_to_string(TOKEN_FILE) {
        Ok(token) => {
            let token = token.trim().to_string();
            Ok((!token.is_empty()).then_some(token))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn persist_token(client: &BloggyClient) -> Result<()> {
    if let Some(token) = client.get_token() {
        fs::write(TOKEN_FILE, token)?;
    }
    Ok(())
}

fn drop_token() -> Result<()> {
    match fs::remove_file(TOKEN_FILE) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn map_client_error(err: BloggyClientError) -> anyhow::Error {
    match err {
        BloggyClientError::Unauthorized => {
            anyhow!("unauthorized: log in first (bloggy-cli login) or check ownership")
        }
        BloggyClientError::NotFound => anyhow!("not found"),
        BloggyClientError::InvalidRequest(message) => anyhow!(message),
        BloggyClientError::Http(err) => anyhow!("http error: {err}"),
    }
}
