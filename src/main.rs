use bunfig_auth::BunfigAuth;
use miette::Result;

#[async_std::main]
async fn main() -> Result<()> {
    BunfigAuth::load().await
}
