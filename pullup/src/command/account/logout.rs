use eyre::Result;
use pullup_client::ApiProvider;

pub async fn run(api: &ApiProvider) -> Result<()> {
    if !api.is_logged_in() {
        println!("You are not logged in.");
        return Ok(());
    }

    api.logout().await?;

    println!("You are logged out!");
    Ok(())
}
