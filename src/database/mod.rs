use mongodb::{Client, Collection, Database};
use std::error::Error;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        // Timeouts
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("storefront");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates necessary indexes for optimal query performance
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        // Index for users: (email) unique - login lookup
        let users = self.database().collection::<mongodb::bson::Document>("users");

        let users_email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(users_email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index for orders: (userId) - list user orders
        let orders = self.database().collection::<mongodb::bson::Document>("orders");

        let orders_user_index = IndexModel::builder()
            .keys(doc! { "userId": 1 })
            .build();

        match orders.create_index(orders_user_index).await {
            Ok(_) => log::info!("   ✅ Index created: orders(userId)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index for orders: (date) - admin listing sorted by recency
        let orders_date_index = IndexModel::builder()
            .keys(doc! { "date": -1 })
            .build();

        match orders.create_index(orders_date_index).await {
            Ok(_) => log::info!("   ✅ Index created: orders(date)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index for products: (category, subCategory) - catalog filtering
        let products = self.database().collection::<mongodb::bson::Document>("products");

        let products_category_index = IndexModel::builder()
            .keys(doc! { "category": 1, "subCategory": 1 })
            .build();

        match products.create_index(products_category_index).await {
            Ok(_) => log::info!("   ✅ Index created: products(category, subCategory)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
