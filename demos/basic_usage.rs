// Example: Basic translation
// Run with: cargo run --example basic_usage

use fetchsql::{FetchParser, SqlRenderer};

fn main() -> anyhow::Result<()> {
    println!("=== fetchsql Basic Usage Example ===\n");

    let renderer = SqlRenderer::new();

    // 1. A single entity with a row limit
    println!("1. Top 10 accounts...");
    let request = FetchParser::parse(
        "<fetch top='10'>
           <entity name='account'>
             <attribute name='name' />
             <attribute name='accountnumber' />
           </entity>
         </fetch>",
    )?;
    println!("{}\n", renderer.render(&request));

    // 2. A filter and a linked entity
    println!("2. Accounts created before a date, with their contacts...");
    let request = FetchParser::parse(
        "<fetch top='50' no-lock='true'>
           <entity name='account'>
             <attribute name='name' />
             <attribute name='address' />
             <filter>
               <condition attribute='createdon' operator='lt' value='2019-03-21' />
             </filter>
             <link-entity name='contact' from='parentcustomerid' to='accountid'>
               <attribute name='fullname' />
               <order attribute='firstname' />
             </link-entity>
           </entity>
         </fetch>",
    )?;
    println!("{}\n", renderer.render(&request));

    // 3. The parsed model, link-entity included
    println!("3. Parsed model...");
    println!("{}\n", serde_json::to_string_pretty(&request)?);

    // 4. Errors
    println!("4. An entity without a name...");
    match FetchParser::parse("<fetch><entity /></fetch>") {
        Ok(request) => println!("{}\n", renderer.render(&request)),
        Err(e) => println!("Error: {}\n", e),
    }

    println!("=== Example Complete ===");
    Ok(())
}
