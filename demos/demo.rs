//! Walk through the main Mailgun operations against a real account.
//!
//! Reads the account from `MAILGUN_*` environment variables, falling back to
//! `mailgun.properties` in the working directory.
//!
//! Run with: cargo run --example demo -- <list-address> [campaign-id]

use mailgun_manager::{Account, Client, EmailRequest, ListMember, ListMemberRequest};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct MemberDetails {
    city: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), mailgun_manager::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailgun_manager=debug".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let list = args.next().unwrap_or_else(|| "dev@samples.mailgun.org".to_string());
    let campaign_id = args.next();

    let client = match Account::from_env() {
        Ok(account) => Client::with_account(account)?,
        Err(_) => Client::new()?,
    };
    let domain = client.account().domain().to_string();

    println!("=== Mailgun demo ({domain}) ===\n");

    println!("Step 1: Validating an address...");
    let validation = client.validate_address("foo@mailgun.nett").await?;
    println!(
        "  {} valid={} did_you_mean={:?}\n",
        validation.address, validation.is_valid, validation.did_you_mean
    );

    println!("Step 2: Sending a test-mode message...");
    let request = EmailRequest::new()
        .from(&format!("Demo <postmaster@{domain}>"))?
        .to([list.as_str()])?
        .subject("Hello from mailgun-manager")
        .text("Testing some Mailgun awesomeness!")
        .header("X-Demo", "1")
        .test_mode(true);
    println!("  accepted: {}\n", client.send_message(&request).await?);

    println!("Step 3: Mailing lists...");
    for info in client.mailing_lists().await?.unwrap_or_default() {
        println!("  {} ({} members)", info.address, info.count.unwrap_or_default());
    }
    println!();

    println!("Step 4: Managing members of {list}...");
    let member = ListMemberRequest::new("Demo Member <demo.member@example.com>")?
        .vars(&serde_json::json!({ "city": "Seattle" }))?;
    println!("  added: {}", client.add_list_member(&list, &member).await?);

    let batch = ["one@example.com", "two@example.com"]
        .iter()
        .map(|address| ListMember::<serde_json::Value>::new(address))
        .collect::<Result<Vec<_>, _>>()?;
    println!("  bulk added: {}", client.add_list_members(&list, &batch).await?);

    match client.list_members_as::<MemberDetails>(&list).await {
        Ok(members) => {
            for member in members.unwrap_or_default() {
                let city = member.vars().and_then(|v| v.city.as_deref()).unwrap_or("-");
                println!("  {member} subscribed={} city={city}", member.is_subscribed());
            }
        }
        Err(e) => println!("  members did not convert: {e}"),
    }

    println!(
        "  unsubscribed: {}",
        client.unsubscribe_list_member(&list, "demo.member@example.com").await?
    );
    for address in ["demo.member@example.com", "one@example.com", "two@example.com"] {
        println!("  deleted {address}: {}", client.delete_list_member(&list, address).await?);
    }
    println!();

    if let Some(id) = campaign_id {
        println!("Step 5: Exporting events of campaign {id}...");
        if let Some(campaign) = client.campaign(&id).await? {
            println!("  {:?} delivered={:?}", campaign.name, campaign.delivered_count);
        }
        let path = client.save_campaign_events_csv(&id, std::env::temp_dir()).await?;
        println!("  written to {}", path.display());
    }

    Ok(())
}
