use anyhow::{bail, Context};
use chaek_client::{
    api::{AuthToken, BookSearch, NewUser, SearchField, UserId, Uuid},
    ApiClient, Server,
};

#[derive(structopt::StructOpt)]
struct Opt {
    #[structopt(short, long)]
    host: String,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Provision a user (requires the ADMIN_TOKEN environment variable)
    CreateUser {
        /// Display name
        name: String,

        /// Initial password
        initial_password: String,
    },

    /// Search the book catalog
    SearchBooks {
        query: String,

        /// One of title, author, isbn
        #[structopt(short, long, default_value = "title")]
        field: String,
    },

    /// List recent posts
    ListPosts {
        #[structopt(short, long, default_value = "1")]
        page: u32,

        #[structopt(short, long, default_value = "20")]
        limit: u32,
    },
}

fn admin_token() -> anyhow::Result<AuthToken> {
    let tok =
        std::env::var("ADMIN_TOKEN").context("retrieving ADMIN_TOKEN environment variable")?;
    let tok = Uuid::try_parse(&tok).context("parsing ADMIN_TOKEN as an auth token")?;
    Ok(AuthToken(tok))
}

fn parse_field(field: &str) -> anyhow::Result<SearchField> {
    Ok(match field {
        "title" => SearchField::Title,
        "author" => SearchField::Author,
        "isbn" => SearchField::Isbn,
        _ => bail!("unknown search field {field:?}, expected title, author or isbn"),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    let mut client = ApiClient::new(opt.host);

    match opt.cmd {
        Command::CreateUser {
            name,
            initial_password,
        } => {
            client
                .create_user(
                    &admin_token()?,
                    NewUser::new(UserId(Uuid::new_v4()), name, initial_password),
                )
                .await
                .context("creating user")?;
        }
        Command::SearchBooks { query, field } => {
            let page = client
                .search_books(&BookSearch {
                    query,
                    field: parse_field(&field)?,
                    page: 1,
                    limit: 20,
                })
                .await
                .context("searching the catalog")?;
            println!("{} result(s)", page.total);
            for book in page.books {
                println!("{} — {} ({}, {})", book.isbn, book.title, book.author, book.publisher);
            }
        }
        Command::ListPosts { page, limit } => {
            let posts = client
                .list_posts(page, limit)
                .await
                .context("listing posts")?;
            println!("{} post(s)", posts.total);
            for post in posts.posts {
                println!(
                    "{} {} {} [{}]",
                    post.id.0,
                    "★".repeat(post.rating as usize),
                    post.book.title,
                    post.hashtags.join(", "),
                );
            }
        }
    }

    Ok(())
}
